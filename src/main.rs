//! Scholarship Tracker: one run per invocation (schedule it with cron or CI).
//! Fetch sources, ask the AI advisor, write the report, notify Discord.

use anyhow::Result;
use scholarship_tracker::{init_tracing, Secrets, Tracker, TrackerConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = TrackerConfig::load_default()?;
    let secrets = Secrets::from_env();
    info!(?secrets, report = %cfg.report_path.display(), "scholarship tracker starting");

    let tracker = Tracker::from_config(&cfg, &secrets)?;
    let summary = tracker.run_once().await?;

    for outcome in [&summary.embassy, &summary.news, &summary.listing] {
        if let scholarship_tracker::FetchOutcome::Failed { provider, error } = outcome {
            warn!(%provider, %error, "source degraded to empty");
        }
    }
    info!(
        news = summary.news.items().len(),
        listing = summary.listing.items().len(),
        mext = summary.embassy_item().is_some(),
        sent = summary.sends.sent,
        failed = summary.sends.failed,
        "run finished"
    );
    Ok(())
}
