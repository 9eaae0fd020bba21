// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{FeedEntry, FeedSource};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "newswatch_entries_total",
            "Total entries parsed from feed sources."
        );
        describe_counter!(
            "newswatch_dropped_no_link_total",
            "Entries dropped for lacking a link."
        );
        describe_counter!(
            "newswatch_source_errors_total",
            "Feed fetch/parse errors (source skipped, run continues)."
        );
        describe_histogram!("newswatch_feed_parse_ms", "Feed parse time in milliseconds.");
    });
}

/// Normalize entry text: decode HTML entities, strip tags, collapse
/// whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("valid regex"));
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("valid regex"));
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Fetch and normalize entries from every source, in order.
///
/// A failing source is logged with its URL and skipped; remaining sources
/// still run. Entries without a link are dropped here (a link is the minimum
/// identity requirement). Identical links across sources are passed through:
/// the orchestrator owns cross-source dedup, because the two modes dedup
/// differently (ledger fingerprints vs first-seen during ranking).
pub async fn collect(sources: &[Box<dyn FeedSource>]) -> Vec<FeedEntry> {
    ensure_metrics_described();

    let mut out = Vec::new();
    for src in sources {
        let entries = match src.fetch().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = ?e, source = src.url(), "feed source error, skipping");
                counter!("newswatch_source_errors_total").increment(1);
                continue;
            }
        };
        for raw in entries {
            let link = raw.link.trim().to_string();
            if link.is_empty() {
                counter!("newswatch_dropped_no_link_total").increment(1);
                continue;
            }
            out.push(FeedEntry {
                title: normalize_text(&raw.title),
                summary: normalize_text(&raw.summary),
                link,
                published_at: raw.published_at,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_strips_tags_and_collapses_ws() {
        let s = "  <b>Hello&nbsp;&nbsp;world</b>   again ";
        assert_eq!(normalize_text(s), "Hello world again");
    }

    #[test]
    fn normalize_text_caps_length() {
        let long = "x".repeat(2000);
        assert_eq!(normalize_text(&long).chars().count(), 1500);
    }
}
