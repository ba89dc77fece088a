// tests/common/mod.rs
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use scholarship_tracker::http::Transport;
use std::sync::Mutex;

/// In-memory transport: GETs are answered by the first route whose pattern
/// is a substring of the URL; unmatched GETs fail like a refused connection.
/// Every POST is recorded.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<(String, Result<String, String>)>,
    fail_posts: bool,
    pub gets: Mutex<Vec<String>>,
    pub posts: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, pattern: &str, body: impl Into<String>) -> Self {
        self.routes.push((pattern.to_string(), Ok(body.into())));
        self
    }

    pub fn fail(mut self, pattern: &str, error: &str) -> Self {
        self.routes.push((pattern.to_string(), Err(error.to_string())));
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    pub fn get_count(&self) -> usize {
        self.gets.lock().unwrap().len()
    }

    pub fn post_bodies(&self) -> Vec<serde_json::Value> {
        self.posts.lock().unwrap().iter().map(|(_, b)| b.clone()).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        self.gets.lock().unwrap().push(url.to_string());
        match self.routes.iter().find(|(p, _)| url.contains(p.as_str())) {
            Some((_, Ok(body))) => Ok(body.clone()),
            Some((_, Err(e))) => Err(anyhow!("GET {url}: {e}")),
            None => Err(anyhow!("GET {url}: connection refused")),
        }
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<()> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        if self.fail_posts {
            return Err(anyhow!("webhook non-2xx: 500 Internal Server Error"));
        }
        Ok(())
    }
}

/// RSS 2.0 document with the given titles (links derived from the index).
pub fn rss_feed(titles: &[&str]) -> String {
    let items: String = titles
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "<item><title>{t}</title><link>https://news.example/a/{i}</link>\
                 <pubDate>Sun, 18 Oct 2026 07:00:00 GMT</pubDate></item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>feed</title>{items}</channel></rss>"#
    )
}
