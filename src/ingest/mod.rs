// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{FetchOutcome, Item, SourceProvider};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Items produced by providers.");
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[a-z][^>]*>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace (Unicode-aware, so NBSP from &nbsp; goes too)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Append `item` unless the list is full or (with `dedup`) the title is
/// already present. Returns `true` when the item was kept.
pub fn push_capped(items: &mut Vec<Item>, item: Item, cap: usize, dedup: bool) -> bool {
    if items.len() >= cap {
        return false;
    }
    if dedup && items.iter().any(|it| it.title == item.title) {
        return false;
    }
    items.push(item);
    true
}

/// Run one provider; errors degrade to `FetchOutcome::Failed` (no items).
pub async fn fetch_or_empty(provider: &dyn SourceProvider) -> FetchOutcome {
    ensure_metrics_described();
    tracing::info!(provider = provider.name(), "fetching source");

    match provider.fetch_latest().await {
        Ok(items) => {
            counter!("ingest_items_total").increment(items.len() as u64);
            tracing::info!(provider = provider.name(), count = items.len(), "source fetched");
            FetchOutcome::Fetched(items)
        }
        Err(e) => {
            tracing::warn!(error = ?e, provider = provider.name(), "provider error");
            counter!("ingest_provider_errors_total").increment(1);
            FetchOutcome::Failed {
                provider: provider.name(),
                error: format!("{e:#}"),
            }
        }
    }
}
