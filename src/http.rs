// src/http.rs
//! Thin async transport used by the source providers and the webhook notifier.
//! Tests swap in a recording mock; production uses `ReqwestTransport`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::config::HttpConfig;

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the body. Non-2xx statuses are errors.
    async fn get_text(&self, url: &str) -> Result<String>;
    /// POST `body` as JSON to `url`. Non-2xx statuses are errors.
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<()>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(cfg: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&cfg.user_agent).context("invalid user agent header")?,
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(cfg.timeout_secs.min(10)))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} non-2xx"))?;
        resp.text().await.with_context(|| format!("GET {url} .text()"))
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<()> {
        // Webhook URLs embed their token; keep them out of error messages.
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("webhook post")?
            .error_for_status()
            .map_err(reqwest::Error::without_url)
            .context("webhook non-2xx")?;
        Ok(())
    }
}
