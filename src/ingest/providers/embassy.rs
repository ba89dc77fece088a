// src/ingest/providers/embassy.rs
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use scraper::Html;

use crate::config::EmbassyConfig;
use crate::http::Transport;
use crate::ingest::normalize_text;
use crate::ingest::types::{Item, SourceProvider};

/// MEXT (Monbukagakusho) status monitor on the Embassy of Japan site.
/// Yields exactly one item whose `status` is the registration-period line.
pub struct EmbassyStatusProvider {
    cfg: EmbassyConfig,
    transport: Arc<dyn Transport>,
}

impl EmbassyStatusProvider {
    pub fn new(cfg: EmbassyConfig, transport: Arc<dyn Transport>) -> Self {
        Self { cfg, transport }
    }

    fn item_from_html(&self, html: &str) -> Item {
        let status = extract_status_line(html, &self.cfg.marker)
            .unwrap_or_else(|| self.cfg.fallback_status.clone());
        Item::new(&self.cfg.title, &self.cfg.url, &self.cfg.label).with_status(status)
    }
}

/// Visible text of the document with the original line breaks preserved.
fn document_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    doc.root_element().text().collect::<String>()
}

/// First line of the page text containing `marker`, trimmed.
pub fn extract_status_line(html: &str, marker: &str) -> Option<String> {
    if marker.is_empty() {
        return None;
    }
    document_text(html)
        .lines()
        .find(|line| line.contains(marker))
        .map(normalize_text)
        .filter(|line| !line.is_empty())
}

#[async_trait]
impl SourceProvider for EmbassyStatusProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let body = self.transport.get_text(&self.cfg.url).await?;
        Ok(vec![self.item_from_html(&body)])
    }

    fn name(&self) -> &'static str {
        "Embassy of Japan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_marker_line_and_trims_it() {
        let html = "<html><body>\n<h1>Beasiswa</h1>\n<p>   Masa Pendaftaran: 1 Maret - 1 Mei 2026   </p>\n<p>Lain</p></body></html>";
        assert_eq!(
            extract_status_line(html, "Masa Pendaftaran").as_deref(),
            Some("Masa Pendaftaran: 1 Maret - 1 Mei 2026")
        );
    }

    #[test]
    fn inline_markup_is_joined_into_one_line() {
        let html = "<div><b>Masa Pendaftaran</b>: <span>April 2026</span></div>";
        assert_eq!(
            extract_status_line(html, "Masa Pendaftaran").as_deref(),
            Some("Masa Pendaftaran: April 2026")
        );
    }

    #[test]
    fn missing_marker_yields_none() {
        let html = "<p>Pengumuman umum</p>";
        assert!(extract_status_line(html, "Masa Pendaftaran").is_none());
    }
}
