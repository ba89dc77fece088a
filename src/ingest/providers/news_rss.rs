// src/ingest/providers/news_rss.rs
use std::borrow::Cow;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use serde::Deserialize;
use url::Url;

use crate::config::NewsConfig;
use crate::http::Transport;
use crate::ingest::types::{Item, SourceProvider};
use crate::ingest::{normalize_text, push_capped};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    title: Option<String>,
    link: Option<String>,
}

/// Google News RSS search across a fixed list of queries. Failed queries are
/// logged and skipped; the accumulated list is capped and title-deduplicated.
pub struct NewsSearchProvider {
    cfg: NewsConfig,
    transport: Arc<dyn Transport>,
}

impl NewsSearchProvider {
    pub fn new(cfg: NewsConfig, transport: Arc<dyn Transport>) -> Self {
        Self { cfg, transport }
    }

    pub fn search_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.cfg.search_url,
            &[
                ("q", query),
                ("hl", self.cfg.hl.as_str()),
                ("gl", self.cfg.gl.as_str()),
                ("ceid", self.cfg.ceid.as_str()),
            ],
        )
        .with_context(|| format!("invalid news search url {}", self.cfg.search_url))
    }

    async fn fetch_query(&self, query: &str) -> Result<Vec<Item>> {
        let url = self.search_url(query)?;
        let body = self.transport.get_text(url.as_str()).await?;
        parse_feed(&body, &self.cfg.label)
    }

    /// Best-effort og:image lookup; any failure just means "no image".
    async fn lookup_image(&self, link: &str) -> Option<String> {
        match self.transport.get_text(link).await {
            Ok(html) => extract_og_image(&html),
            Err(e) => {
                tracing::debug!(error = ?e, %link, "og:image lookup failed");
                None
            }
        }
    }
}

/// Rewrite HTML named entities that XML does not know (`&hellip;`, `&eacute;`)
/// so one stray entity cannot sink the whole feed. The five XML entities are
/// left alone; names html-escape cannot resolve become literal text.
fn scrub_html_entities_for_xml(s: &str) -> Cow<'_, str> {
    static RE_ENTITY: OnceCell<Regex> = OnceCell::new();
    let re = RE_ENTITY.get_or_init(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").unwrap());
    re.replace_all(s, |caps: &Captures<'_>| {
        let whole = &caps[0];
        match &caps[1] {
            "amp" | "lt" | "gt" | "quot" | "apos" => whole.to_string(),
            _ => {
                let decoded = html_escape::decode_html_entities(whole);
                if decoded == whole {
                    format!("&amp;{}", &whole[1..])
                } else {
                    html_escape::encode_quoted_attribute(&decoded).into_owned()
                }
            }
        }
    })
}

/// Parse an RSS 2.0 document into items. Entries without a title or an
/// absolute http(s) link are dropped.
pub fn parse_feed(xml: &str, label: &str) -> Result<Vec<Item>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).context("parsing news rss xml")?;

    let mut out = Vec::with_capacity(rss.channel.item.len());
    for entry in rss.channel.item {
        let title = normalize_text(entry.title.as_deref().unwrap_or_default());
        let link = entry.link.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() || !is_http_url(link) {
            continue;
        }
        out.push(Item::new(title, link, label));
    }
    Ok(out)
}

fn is_http_url(s: &str) -> bool {
    Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

pub fn extract_og_image(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(r#"meta[property="og:image"]"#).ok()?;
    doc.select(&sel)
        .filter_map(|m| m.value().attr("content"))
        .map(str::trim)
        .find(|c| is_http_url(c))
        .map(str::to_string)
}

#[async_trait]
impl SourceProvider for NewsSearchProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let cap = self.cfg.max_items;
        let mut results: Vec<Item> = Vec::with_capacity(cap);

        for query in &self.cfg.queries {
            if results.len() >= cap {
                break;
            }
            match self.fetch_query(query).await {
                Ok(entries) => {
                    for it in entries {
                        push_capped(&mut results, it, cap, self.cfg.dedup_titles);
                        if results.len() >= cap {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = ?e, %query, provider = self.name(), "news query failed");
                }
            }
        }

        if self.cfg.fetch_images {
            for item in results.iter_mut() {
                let image = self.lookup_image(&item.link).await;
                item.image = image;
            }
        }

        Ok(results)
    }

    fn name(&self) -> &'static str {
        "Google News"
    }
}
