// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod advisor;
pub mod config;
pub mod hook;
pub mod http;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::config::{Secrets, TrackerConfig};
pub use crate::ingest::types::{FetchOutcome, Item, SourceProvider};
pub use crate::pipeline::{RunSummary, Tracker};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact console logs. `RUST_LOG` overrides the default filter;
/// `TRACKER_LOG_JSON=1` switches to JSON lines (CI log collectors).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scholarship_tracker=info,check_models=info,warn"));

    let json = std::env::var("TRACKER_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    // Already initialised (tests, embedding) is fine.
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}
