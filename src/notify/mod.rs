// src/notify/mod.rs
pub mod slack;

use anyhow::Result;

/// One-way delivery capability: send a single Markdown-flavored text message.
/// Any non-2xx response or transport error is a failure; the caller decides
/// whether that is retried (alert mode, next run) or terminal (digest mode).
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
}
