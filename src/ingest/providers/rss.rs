// src/ingest/providers/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;
use time::{
    format_description::well_known::{Rfc2822, Rfc3339},
    OffsetDateTime, UtcOffset,
};

use crate::ingest::types::{FeedEntry, FeedSource};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "newswatch/0.1 (+cron)";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    summary: Option<String>,
}

/// Parse a feed timestamp. RSS 2.0 mandates RFC 2822 but plenty of feeds emit
/// ISO 8601, so fall back to RFC 3339; anything else is treated as absent.
fn parse_pub_date(ts: &str) -> Option<DateTime<Utc>> {
    let parsed = OffsetDateTime::parse(ts, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(ts, &Rfc3339))
        .ok()?;
    let unix = parsed.to_offset(UtcOffset::UTC).unix_timestamp();
    DateTime::from_timestamp(unix, 0)
}

/// RSS 2.0 feed source. HTTP mode fetches the configured URL with a bounded
/// timeout; fixture mode parses a provided string (tests, offline runs).
pub struct RssFeedSource {
    mode: Mode,
}

enum Mode {
    Fixture { label: String, body: String },
    Http { url: String, client: reqwest::Client },
}

impl RssFeedSource {
    pub fn from_url(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("building feed http client")?;
        Ok(Self {
            mode: Mode::Http { url, client },
        })
    }

    pub fn from_fixture_str(label: &str, body: &str) -> Self {
        Self {
            mode: Mode::Fixture {
                label: label.to_string(),
                body: body.to_string(),
            },
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<FeedEntry>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let summary = it
                .summary
                .or(it.description)
                .unwrap_or_default();
            out.push(FeedEntry {
                title: it.title.unwrap_or_default(),
                summary,
                link: it.link.unwrap_or_default(),
                published_at: it.pub_date.as_deref().and_then(parse_pub_date),
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("newswatch_feed_parse_ms").record(ms);
        counter!("newswatch_entries_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn fetch(&self) -> Result<Vec<FeedEntry>> {
        match &self.mode {
            Mode::Fixture { body, .. } => Self::parse_items_from_str(body),

            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("fetching feed {url}"))?;
                let body = resp
                    .error_for_status()
                    .with_context(|| format!("feed {url} returned error status"))?
                    .text()
                    .await
                    .with_context(|| format!("reading feed body from {url}"))?;
                Self::parse_items_from_str(&body)
            }
        }
    }

    fn url(&self) -> &str {
        match &self.mode {
            Mode::Fixture { label, .. } => label,
            Mode::Http { url, .. } => url,
        }
    }
}

/// quick-xml rejects HTML-only entities, so replace the usual offenders
/// before handing the document to the XML parser.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
