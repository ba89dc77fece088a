// src/ingest/types.rs
use anyhow::Result;

/// One normalized scholarship/news record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub link: String,   // absolute URL
    pub source: String, // e.g., "Embassy of Japan", "ScholarshipTab"
    pub status: Option<String>,
    pub image: Option<String>,
}

impl Item {
    pub fn new(title: impl Into<String>, link: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            source: source.into(),
            status: None,
            image: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Item>>;
    fn name(&self) -> &'static str;
}

/// Result of running one provider. Both variants render as "no items"
/// downstream; the failure is kept for logs and the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(Vec<Item>),
    Failed {
        provider: &'static str,
        error: String,
    },
}

impl FetchOutcome {
    pub fn items(&self) -> &[Item] {
        match self {
            FetchOutcome::Fetched(v) => v,
            FetchOutcome::Failed { .. } => &[],
        }
    }

    pub fn into_items(self) -> Vec<Item> {
        match self {
            FetchOutcome::Fetched(v) => v,
            FetchOutcome::Failed { .. } => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }
}
