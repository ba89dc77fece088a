// src/ingest/providers/listing.rs
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::config::ListingConfig;
use crate::http::Transport;
use crate::ingest::types::{Item, SourceProvider};
use crate::ingest::{normalize_text, push_capped};

/// ScholarshipTab "fully funded" directory: one item per heading anchor.
pub struct ListingPageProvider {
    cfg: ListingConfig,
    transport: Arc<dyn Transport>,
}

impl ListingPageProvider {
    pub fn new(cfg: ListingConfig, transport: Arc<dyn Transport>) -> Self {
        Self { cfg, transport }
    }
}

/// Extract up to `cap` items from headings matching `heading_selector`.
/// Relative hrefs are resolved against `base`; non-http(s) links are dropped.
pub fn parse_listing(
    html: &str,
    heading_selector: &str,
    base: &Url,
    label: &str,
    cap: usize,
) -> Result<Vec<Item>> {
    let headings = Selector::parse(heading_selector)
        .map_err(|e| anyhow!("invalid heading selector {heading_selector:?}: {e:?}"))?;
    let anchor = Selector::parse("a[href]").map_err(|e| anyhow!("anchor selector: {e:?}"))?;

    let doc = Html::parse_document(html);
    let mut out = Vec::with_capacity(cap);
    for heading in doc.select(&headings) {
        if out.len() >= cap {
            break;
        }
        let Some(a) = heading.select(&anchor).next() else {
            continue;
        };
        let title = normalize_text(&a.text().collect::<String>());
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let Ok(link) = base.join(href.trim()) else {
            tracing::debug!(%href, "unresolvable listing href");
            continue;
        };
        if title.is_empty() || !matches!(link.scheme(), "http" | "https") {
            continue;
        }
        push_capped(&mut out, Item::new(title, link.as_str(), label), cap, false);
    }
    Ok(out)
}

#[async_trait]
impl SourceProvider for ListingPageProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let base = Url::parse(&self.cfg.base_url)
            .with_context(|| format!("invalid listing base url {}", self.cfg.base_url))?;
        let body = self.transport.get_text(&self.cfg.url).await?;
        parse_listing(
            &body,
            &self.cfg.heading_selector,
            &base,
            &self.cfg.label,
            self.cfg.max_items,
        )
    }

    fn name(&self) -> &'static str {
        "ScholarshipTab"
    }
}
