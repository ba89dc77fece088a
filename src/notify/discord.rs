use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Embed, EmbedFooter, EmbedImage, NotificationPayload, SendStats};
use crate::config::NotifyConfig;
use crate::hook::generate_hook_with;
use crate::http::Transport;
use crate::ingest::types::Item;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("notify_posts_total", "Webhook POSTs that returned 2xx.");
        describe_counter!("notify_post_errors_total", "Webhook POSTs that failed.");
    });
}

/// Discord webhook sender. No retries: a failed POST is logged, counted and
/// skipped, and the caller carries on.
pub struct DiscordNotifier {
    webhook: String,
    transport: Arc<dyn Transport>,
    cfg: NotifyConfig,
    rng: Mutex<StdRng>,
}

impl DiscordNotifier {
    pub fn new(webhook: String, transport: Arc<dyn Transport>, cfg: NotifyConfig) -> Self {
        Self {
            webhook,
            transport,
            cfg,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Fixed hook choice for tests/tools.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Plain-text message(s). Bodies over `text_limit` chars go out as
    /// numbered parts; an empty body sends nothing.
    pub async fn send_text(&self, title: &str, body: &str) -> Result<SendStats> {
        let payloads = text_payloads(&self.cfg, title, body);
        self.post_all(title, &payloads).await
    }

    /// Embed cards, `embed_limit` per message. An empty list sends nothing.
    pub async fn send_embeds(&self, title: &str, color: u32, items: &[Item]) -> Result<SendStats> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let payloads = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            embed_payloads(&self.cfg, title, color, items, &timestamp, &mut *rng)
        };
        self.post_all(title, &payloads).await
    }

    async fn post_all(&self, title: &str, payloads: &[NotificationPayload]) -> Result<SendStats> {
        ensure_metrics_described();
        let mut stats = SendStats::default();
        let total = payloads.len();
        for (idx, payload) in payloads.iter().enumerate() {
            let body = serde_json::to_value(payload).context("serializing webhook payload")?;
            match self.transport.post_json(&self.webhook, &body).await {
                Ok(()) => {
                    stats.sent += 1;
                    counter!("notify_posts_total").increment(1);
                    tracing::info!(%title, part = idx + 1, total, "sent to Discord");
                }
                Err(e) => {
                    stats.failed += 1;
                    counter!("notify_post_errors_total").increment(1);
                    tracing::warn!(error = ?e, %title, part = idx + 1, total, "failed to send to Discord");
                }
            }
        }
        Ok(stats)
    }
}

/// Split `body` into consecutive slices of at most `limit` chars, never
/// cutting through a code point.
pub fn chunk_text(body: &str, limit: usize) -> Vec<&str> {
    let limit = limit.max(1);
    let mut parts = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in body.char_indices() {
        if count == limit {
            parts.push(&body[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < body.len() {
        parts.push(&body[start..]);
    }
    parts
}

pub fn text_payloads(cfg: &NotifyConfig, title: &str, body: &str) -> Vec<NotificationPayload> {
    if body.is_empty() {
        return Vec::new();
    }
    let message = |content: String| NotificationPayload {
        username: cfg.username.clone(),
        content,
        embeds: None,
    };
    if body.chars().count() <= cfg.text_limit {
        return vec![message(format!("**{title}**\n{body}"))];
    }
    chunk_text(body, cfg.text_limit)
        .into_iter()
        .enumerate()
        .map(|(i, part)| message(format!("**{title} (Part {})**\n{part}", i + 1)))
        .collect()
}

pub fn item_embed<R: Rng + ?Sized>(
    cfg: &NotifyConfig,
    item: &Item,
    color: u32,
    timestamp: &str,
    rng: &mut R,
) -> Embed {
    let mut description = format!("Sumber: {}", item.source);
    if let Some(status) = &item.status {
        description.push_str(&format!("\n**Status/Jadwal:** {status}"));
    }
    Embed {
        title: generate_hook_with(rng, &item.title),
        url: item.link.clone(),
        description,
        color,
        timestamp: timestamp.to_string(),
        footer: EmbedFooter {
            text: cfg.footer.clone(),
        },
        image: item.image.clone().map(|url| EmbedImage { url }),
    }
}

pub fn embed_payloads<R: Rng + ?Sized>(
    cfg: &NotifyConfig,
    title: &str,
    color: u32,
    items: &[Item],
    timestamp: &str,
    rng: &mut R,
) -> Vec<NotificationPayload> {
    let limit = cfg.embed_limit.max(1);
    let multipart = items.len() > limit;
    items
        .chunks(limit)
        .enumerate()
        .map(|(i, batch)| NotificationPayload {
            username: cfg.username.clone(),
            content: if multipart {
                format!("**{title} (Part {})**", i + 1)
            } else {
                format!("**{title}**")
            },
            embeds: Some(
                batch
                    .iter()
                    .map(|it| item_embed(cfg, it, color, timestamp, &mut *rng))
                    .collect(),
            ),
        })
        .collect()
}
