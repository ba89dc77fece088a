// src/ingest/providers/mod.rs
pub mod embassy;
pub mod listing;
pub mod news_rss;

pub use embassy::EmbassyStatusProvider;
pub use listing::ListingPageProvider;
pub use news_rss::NewsSearchProvider;
