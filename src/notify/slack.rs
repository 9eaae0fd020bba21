// src/notify/slack.rs
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::time::Duration;

use super::Notifier;

const ENV_WEBHOOK: &str = "SLACK_WEBHOOK_URL";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Slack incoming-webhook notifier. No in-process retry: alert mode retries
/// naturally on the next scheduled run, digest mode has no retry concept.
pub struct SlackNotifier {
    webhook_url: String,
    client: Client,
    timeout: Duration,
}

impl SlackNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// A missing webhook is a configuration error, surfaced before any
    /// network activity so the process can abort with a distinct status.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(ENV_WEBHOOK)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("{ENV_WEBHOOK} is not set"))?;
        Ok(Self::new(url))
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    async fn send_text(&self, text: &str) -> Result<()> {
        let body = serde_json::json!({ "text": text });

        self.client
            .post(&self.webhook_url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("slack post")?
            .error_for_status()
            .context("slack non-2xx")?;
        Ok(())
    }
}
