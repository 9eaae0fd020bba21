// src/config.rs
//! JSON configuration loading. The config file is externally owned and
//! read-only to the core; malformed content is a hard error raised before any
//! network activity.
//!
//! Format:
//! ```json
//! {
//!   "keywords": ["nvda", "hbm"],
//!   "rss_feeds": ["https://example.com/rss"],
//!   "quiet_hours_kr": [{ "start": "23:30", "end": "07:30" }],
//!   "lookback_hours": 24,
//!   "top_n": 10
//! }
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::quiet::{QuietWindow, MINUTES_PER_DAY};

pub const ENV_CONFIG_PATH: &str = "NEWSWATCH_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    rss_feeds: Vec<String>,
    #[serde(default)]
    quiet_hours_kr: Vec<RawQuietRange>,
    lookback_hours: Option<i64>,
    top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawQuietRange {
    start: String,
    end: String,
}

/// Parsed, validated configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub keywords: Vec<String>,
    pub rss_feeds: Vec<String>,
    pub quiet_windows: Vec<QuietWindow>,
    pub lookback_hours: i64,
    pub top_n: usize,
}

/// Resolve the config path: `$NEWSWATCH_CONFIG_PATH`, else `config.json`.
pub fn default_config_path() -> PathBuf {
    std::env::var(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn parse_config(s: &str) -> Result<AppConfig> {
    let raw: RawConfig = serde_json::from_str(s).context("config is not valid JSON")?;

    let mut quiet_windows = Vec::with_capacity(raw.quiet_hours_kr.len());
    for r in &raw.quiet_hours_kr {
        quiet_windows.push(QuietWindow {
            start_min: parse_hhmm(&r.start)?,
            end_min: parse_hhmm(&r.end)?,
        });
    }

    let lookback_hours = raw.lookback_hours.unwrap_or(DEFAULT_LOOKBACK_HOURS);
    if lookback_hours <= 0 {
        bail!("lookback_hours must be positive, got {lookback_hours}");
    }
    let top_n = raw.top_n.unwrap_or(DEFAULT_TOP_N);
    if top_n == 0 {
        bail!("top_n must be at least 1");
    }

    Ok(AppConfig {
        keywords: raw.keywords,
        rss_feeds: raw.rss_feeds,
        quiet_windows,
        lookback_hours,
        top_n,
    })
}

/// `"23:30"` -> 1410. Rejects anything outside `HH:MM` in `[00:00, 24:00)`.
fn parse_hhmm(s: &str) -> Result<u16> {
    let t = s.trim();
    let Some((hh, mm)) = t.split_once(':') else {
        bail!("expected HH:MM, got {t:?}");
    };
    let h: u16 = hh.parse().with_context(|| format!("bad hour in {t:?}"))?;
    let m: u16 = mm.parse().with_context(|| format!("bad minute in {t:?}"))?;
    if h >= 24 || m >= 60 {
        bail!("time of day out of range: {t:?}");
    }
    let minute = h * 60 + m;
    debug_assert!(minute < MINUTES_PER_DAY);
    Ok(minute)
}
