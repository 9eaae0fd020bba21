// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Normalized article record. Optional-field probing on raw parser output
/// happens exactly once, in the provider; downstream code never branches on
/// field presence except for `published_at`, which some feeds simply omit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    /// May be empty; falls back from `<description>` when the feed has no
    /// dedicated summary element.
    pub summary: String,
    /// Canonical identity of the entry. Entries without a link are dropped
    /// by the collector.
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<FeedEntry>>;
    /// Source URL (or fixture label), used for log context on failures.
    fn url(&self) -> &str;
}
