// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod ingest;
pub mod ledger;
pub mod notify;
pub mod pipeline;
pub mod quiet;
pub mod relevance;
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use crate::config::AppConfig;
pub use crate::ingest::types::{FeedEntry, FeedSource};
pub use crate::ledger::{fingerprint, SentLedger};
pub use crate::notify::{slack::SlackNotifier, Notifier};
pub use crate::pipeline::{MatchResult, RunOutcome, RunReport};
pub use crate::quiet::QuietWindow;
pub use crate::sentiment::Sentiment;
