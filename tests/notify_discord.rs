mod common;

use common::MockTransport;
use scholarship_tracker::config::NotifyConfig;
use scholarship_tracker::hook::HOOK_PREFIXES;
use scholarship_tracker::notify::{DiscordNotifier, COLOR_NEWS};
use scholarship_tracker::Item;
use std::sync::Arc;

const WEBHOOK: &str = "https://discord.example/api/webhooks/1/token";

fn notifier(transport: Arc<MockTransport>) -> DiscordNotifier {
    DiscordNotifier::new(WEBHOOK.to_string(), transport, NotifyConfig::default()).with_rng_seed(9)
}

fn items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            Item::new(
                format!("Beasiswa {i}"),
                format!("https://news.example/{i}"),
                "Deep Search (Scholarships)",
            )
        })
        .collect()
}

/// Strip the `**title...**\n` label line added to every text message.
fn body_of(content: &str) -> &str {
    content.split_once('\n').map(|(_, b)| b).unwrap_or("")
}

#[tokio::test]
async fn body_at_limit_is_one_message() {
    let transport = Arc::new(MockTransport::new());
    let body = "a".repeat(1900);
    let stats = notifier(transport.clone()).send_text("Advisor", &body).await.unwrap();

    assert_eq!(stats.sent, 1);
    let posts = transport.post_bodies();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["content"].as_str().unwrap(), format!("**Advisor**\n{body}"));
    assert_eq!(posts[0]["username"], "Scholarship Tracker Bot");
    assert!(posts[0].get("embeds").is_none());
}

#[tokio::test]
async fn body_over_limit_is_split_and_reconstructs() {
    let transport = Arc::new(MockTransport::new());
    // multi-byte chars make sure slicing counts characters, not bytes
    let body: String = "é🎓x".chars().cycle().take(1901).collect();
    let stats = notifier(transport.clone()).send_text("Advisor", &body).await.unwrap();

    let posts = transport.post_bodies();
    assert!(posts.len() >= 2);
    assert_eq!(stats.sent, posts.len());

    let mut rebuilt = String::new();
    for (i, p) in posts.iter().enumerate() {
        let content = p["content"].as_str().unwrap();
        assert!(content.starts_with(&format!("**Advisor (Part {})**\n", i + 1)));
        let part = body_of(content);
        assert!(part.chars().count() <= 1900);
        rebuilt.push_str(part);
    }
    assert_eq!(rebuilt, body);
}

#[tokio::test]
async fn empty_body_sends_nothing() {
    let transport = Arc::new(MockTransport::new());
    let stats = notifier(transport.clone()).send_text("Advisor", "").await.unwrap();
    assert_eq!(stats.posts(), 0);
    assert!(transport.post_bodies().is_empty());
}

#[tokio::test]
async fn twenty_three_items_make_three_batches() {
    let transport = Arc::new(MockTransport::new());
    let list = items(23);
    let stats = notifier(transport.clone())
        .send_embeds("Deep Search", COLOR_NEWS, &list)
        .await
        .unwrap();

    assert_eq!(stats.sent, 3);
    let posts = transport.post_bodies();
    let sizes: Vec<usize> = posts
        .iter()
        .map(|p| p["embeds"].as_array().unwrap().len())
        .collect();
    assert_eq!(sizes, vec![10, 10, 3]);
    assert_eq!(posts[0]["content"], "**Deep Search (Part 1)**");
    assert_eq!(posts[2]["content"], "**Deep Search (Part 3)**");

    // order preserved, every title hooked, link and color carried over
    let embeds: Vec<&serde_json::Value> = posts
        .iter()
        .flat_map(|p| p["embeds"].as_array().unwrap().iter())
        .collect();
    for (i, e) in embeds.iter().enumerate() {
        let title = e["title"].as_str().unwrap();
        assert!(title.ends_with(&format!(" Beasiswa {i}")));
        assert!(HOOK_PREFIXES.iter().any(|p| title.starts_with(p)));
        assert_eq!(e["url"], format!("https://news.example/{i}"));
        assert_eq!(e["color"], COLOR_NEWS);
        assert_eq!(e["description"], "Sumber: Deep Search (Scholarships)");
        assert!(e["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}

#[tokio::test]
async fn no_items_no_posts() {
    let transport = Arc::new(MockTransport::new());
    let stats = notifier(transport.clone())
        .send_embeds("Deep Search", COLOR_NEWS, &[])
        .await
        .unwrap();
    assert_eq!(stats.posts(), 0);
    assert!(transport.post_bodies().is_empty());
}

#[tokio::test]
async fn failed_posts_are_counted_not_raised() {
    let transport = Arc::new(MockTransport::new().failing_posts());
    let n = notifier(transport.clone());

    let stats = n.send_embeds("Deep Search", COLOR_NEWS, &items(12)).await.unwrap();
    assert_eq!(stats.sent, 0);
    assert_eq!(stats.failed, 2);

    let stats = n.send_text("Advisor", &"b".repeat(4000)).await.unwrap();
    assert_eq!(stats.failed, 3);
}

#[tokio::test]
async fn same_seed_same_hooks() {
    let list = items(3);
    let t1 = Arc::new(MockTransport::new());
    let t2 = Arc::new(MockTransport::new());
    notifier(t1.clone()).send_embeds("X", 1, &list).await.unwrap();
    notifier(t2.clone()).send_embeds("X", 1, &list).await.unwrap();

    let titles = |t: &MockTransport| -> Vec<String> {
        t.post_bodies()[0]["embeds"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(titles(&t1), titles(&t2));
}
