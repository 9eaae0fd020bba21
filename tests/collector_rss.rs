// tests/collector_rss.rs
use newswatch::ingest::{self, providers::rss::RssFeedSource, types::FeedSource};

const FIXTURE: &str = include_str!("fixtures/sample_rss.xml");

#[tokio::test]
async fn fixture_feed_is_normalized_and_linkless_entries_dropped() {
    let sources: Vec<Box<dyn FeedSource>> =
        vec![Box::new(RssFeedSource::from_fixture_str("fixture", FIXTURE))];

    let entries = ingest::collect(&sources).await;

    // Four items in the fixture, one without a link.
    assert_eq!(entries.len(), 3);

    // HTML tags stripped, entities decoded.
    assert_eq!(
        entries[0].title,
        "NVDA beats estimates on data center growth"
    );
    assert!(entries[0].summary.contains("HBM demand"));
    assert!(!entries[0].summary.contains("&ndash;"));
    assert_eq!(
        entries[0].link,
        "https://wire.example.com/articles/nvda-beats"
    );
    assert!(entries[0].published_at.is_some());

    // Entry with no pubDate is kept, with published_at normalized to None.
    let undated = entries
        .iter()
        .find(|e| e.link.ends_with("foundry-roadmap"))
        .unwrap();
    assert!(undated.published_at.is_none());
}

#[tokio::test]
async fn broken_fixture_source_yields_no_entries_but_no_panic() {
    let sources: Vec<Box<dyn FeedSource>> = vec![
        Box::new(RssFeedSource::from_fixture_str("broken", "<rss><chan")),
        Box::new(RssFeedSource::from_fixture_str("fixture", FIXTURE)),
    ];

    // The broken source is skipped; the healthy one still contributes.
    let entries = ingest::collect(&sources).await;
    assert_eq!(entries.len(), 3);
}
