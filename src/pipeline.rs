//! # Orchestrator
//! One tracker run: fetch every source, ask the advisor about one featured
//! scholarship, write the report, then (only with a webhook) push everything
//! to Discord. Strictly sequential; the order of sends is fixed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::advisor::AiAdvisor;
use crate::config::{Secrets, TrackerConfig};
use crate::http::{ReqwestTransport, Transport};
use crate::ingest::fetch_or_empty;
use crate::ingest::providers::{EmbassyStatusProvider, ListingPageProvider, NewsSearchProvider};
use crate::ingest::types::{FetchOutcome, Item, SourceProvider};
use crate::notify::{DiscordNotifier, SendStats, COLOR_EMBASSY, COLOR_LISTING, COLOR_NEWS};
use crate::report::{assemble_report, write_report, ReportInput, ADVISOR_HEADER, NEWS_HEADER};

pub const EMBASSY_EMBED_TITLE: &str = "🇯🇵 Beasiswa MEXT Jepang";
pub const LISTING_EMBED_TITLE: &str = "📚 Peluang Beasiswa Lainnya";

/// The three sources, in fetch order.
pub struct Sources {
    pub embassy: Box<dyn SourceProvider>,
    pub news: Box<dyn SourceProvider>,
    pub listing: Box<dyn SourceProvider>,
}

impl Sources {
    pub fn from_config(cfg: &TrackerConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            embassy: Box::new(EmbassyStatusProvider::new(
                cfg.embassy.clone(),
                transport.clone(),
            )),
            news: Box::new(NewsSearchProvider::new(cfg.news.clone(), transport.clone())),
            listing: Box::new(ListingPageProvider::new(cfg.listing.clone(), transport)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub advisor_topic: Option<String>,
    pub advice: String,
    pub report: String,
    pub report_path: PathBuf,
    pub embassy: FetchOutcome,
    pub news: FetchOutcome,
    pub listing: FetchOutcome,
    pub sends: SendStats,
}

impl RunSummary {
    pub fn embassy_item(&self) -> Option<&Item> {
        self.embassy.items().first()
    }
}

pub struct Tracker {
    sources: Sources,
    advisor: AiAdvisor,
    notifier: Option<DiscordNotifier>,
    report_path: PathBuf,
    send_pause: Duration,
}

/// Embassy status wins; otherwise the first news headline.
pub fn pick_advisor_topic(embassy: Option<&Item>, news: &[Item]) -> Option<String> {
    if let Some(m) = embassy {
        let status = m.status.as_deref().unwrap_or_default();
        return Some(format!("{} - {}", m.title, status));
    }
    news.first().map(|it| it.title.clone())
}

impl Tracker {
    pub fn new(
        sources: Sources,
        advisor: AiAdvisor,
        notifier: Option<DiscordNotifier>,
        report_path: PathBuf,
    ) -> Self {
        Self {
            sources,
            advisor,
            notifier,
            report_path,
            send_pause: Duration::from_millis(1000),
        }
    }

    pub fn with_send_pause(mut self, pause: Duration) -> Self {
        self.send_pause = pause;
        self
    }

    /// Production wiring: reqwest transport, Groq advisor, Discord notifier
    /// when `DISCORD_WEBHOOK` is set.
    pub fn from_config(cfg: &TrackerConfig, secrets: &Secrets) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&cfg.http)?);
        let sources = Sources::from_config(cfg, transport.clone());
        let advisor =
            AiAdvisor::from_config(secrets.groq_api_key.clone(), &cfg.advisor, &cfg.http)?;
        let notifier = secrets
            .discord_webhook
            .clone()
            .map(|url| DiscordNotifier::new(url, transport, cfg.notify.clone()));

        Ok(Self::new(sources, advisor, notifier, cfg.report_path.clone())
            .with_send_pause(Duration::from_millis(cfg.notify.pause_ms)))
    }

    pub async fn run_once(&self) -> Result<RunSummary> {
        // 1) Sources
        let embassy = fetch_or_empty(self.sources.embassy.as_ref()).await;
        let news = fetch_or_empty(self.sources.news.as_ref()).await;
        let listing = fetch_or_empty(self.sources.listing.as_ref()).await;
        let mext = embassy.items().first();

        // 2) Advisor
        let advisor_topic = pick_advisor_topic(mext, news.items());
        let advice = self.advisor.advise(advisor_topic.as_deref()).await;

        // 3) Report
        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let report = assemble_report(&ReportInput {
            generated_at: &generated_at,
            advice: &advice,
            embassy: mext,
            news: news.items(),
            listing: listing.items(),
        });
        write_report(&self.report_path, &report)?;
        info!(path = %self.report_path.display(), "report written");

        // 4) Notifications
        let mut sends = SendStats::default();
        match &self.notifier {
            Some(notifier) => {
                sends += notifier.send_text(ADVISOR_HEADER, &advice).await?;
                if let Some(m) = mext {
                    self.pause().await;
                    sends += notifier
                        .send_embeds(EMBASSY_EMBED_TITLE, COLOR_EMBASSY, std::slice::from_ref(m))
                        .await?;
                }
                self.pause().await;
                sends += notifier
                    .send_embeds(NEWS_HEADER, COLOR_NEWS, news.items())
                    .await?;
                self.pause().await;
                sends += notifier
                    .send_embeds(LISTING_EMBED_TITLE, COLOR_LISTING, listing.items())
                    .await?;
                info!(sent = sends.sent, failed = sends.failed, "notifications done");
            }
            None => info!("no DISCORD_WEBHOOK configured; skipping notifications"),
        }

        Ok(RunSummary {
            advisor_topic,
            advice,
            report,
            report_path: self.report_path.clone(),
            embassy,
            news,
            listing,
            sends,
        })
    }

    async fn pause(&self) {
        if !self.send_pause.is_zero() {
            tokio::time::sleep(self.send_pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_prefers_embassy_then_news() {
        let mext = Item::new("MEXT", "https://e.example", "Embassy of Japan").with_status("Buka");
        let news = vec![Item::new("Headline", "https://n.example", "Deep Search (Scholarships)")];
        assert_eq!(
            pick_advisor_topic(Some(&mext), &news).as_deref(),
            Some("MEXT - Buka")
        );
        assert_eq!(pick_advisor_topic(None, &news).as_deref(), Some("Headline"));
        assert_eq!(pick_advisor_topic(None, &[]), None);
    }
}
