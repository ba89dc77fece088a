mod common;

use common::MockTransport;
use scholarship_tracker::config::ListingConfig;
use scholarship_tracker::ingest::providers::ListingPageProvider;
use scholarship_tracker::ingest::types::SourceProvider;
use std::sync::Arc;
use url::Url;

const LISTING_HTML: &str = include_str!("fixtures/scholarshiptab_fully_funded.html");

#[tokio::test]
async fn caps_at_five_with_absolute_links() {
    let transport = Arc::new(MockTransport::new().route("scholarshiptab.com/fully-funded", LISTING_HTML));
    let provider = ListingPageProvider::new(ListingConfig::default(), transport);

    let items = provider.fetch_latest().await.unwrap();
    assert_eq!(items.len(), 5);
    for it in &items {
        let u = Url::parse(&it.link).expect("absolute url");
        assert!(matches!(u.scheme(), "http" | "https"));
        assert_eq!(it.source, "ScholarshipTab");
    }

    assert_eq!(items[0].title, "Chevening Scholarships in UK 2026");
    assert_eq!(
        items[0].link,
        "https://www.scholarshiptab.com/scholarship/chevening-scholarships-uk"
    );
    assert_eq!(items[3].title, "DAAD Scholarships Germany");
    assert_eq!(
        items[3].link,
        "https://www.scholarshiptab.com/scholarship/daad-germany"
    );
    assert!(items.iter().all(|i| i.title != "Browse Scholarships"));
}

#[tokio::test]
async fn custom_cap_is_honoured() {
    let transport = Arc::new(MockTransport::new().route("fully-funded", LISTING_HTML));
    let provider = ListingPageProvider::new(
        ListingConfig {
            max_items: 2,
            ..ListingConfig::default()
        },
        transport,
    );
    assert_eq!(provider.fetch_latest().await.unwrap().len(), 2);
}

#[tokio::test]
async fn http_error_is_returned_to_ingest_layer() {
    let transport = Arc::new(MockTransport::new().fail("fully-funded", "403 Forbidden"));
    let provider = ListingPageProvider::new(ListingConfig::default(), transport);
    assert!(provider.fetch_latest().await.is_err());
}
