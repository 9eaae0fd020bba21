// src/pipeline.rs
//! Pipeline orchestrator. Two modes over the same building blocks:
//!
//! * **alert** — per-entry streaming flow with a persisted dedup ledger; at
//!   most one message per newly matched, previously-unsent link.
//! * **digest** — stateless batch flow; one ranked summary message per run.
//!
//! Both are single-pass and run-to-completion; scheduling and overlap
//! prevention belong to the external scheduler (cron/CI).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::path::Path;

use crate::config::AppConfig;
use crate::ingest::{
    self,
    types::{FeedEntry, FeedSource},
};
use crate::ledger::{fingerprint, SentLedger, DEFAULT_RETENTION_SECS};
use crate::notify::Notifier;
use crate::quiet::{is_quiet_now, is_within_lookback, KST};
use crate::relevance::{is_relevant, matched_keywords};
use crate::sentiment::{self, Sentiment};

/// Transient per-run record for a relevant entry (digest mode).
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub entry: FeedEntry,
    pub matched: Vec<String>,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Entries collected across all sources (after link filtering).
    pub collected: usize,
    /// Entries that matched at least one keyword.
    pub matched: usize,
    /// Messages actually delivered.
    pub sent: usize,
}

/// Outcome of an alert pass. Suppression is a distinct, observable exit that
/// happens before any fetch and without touching the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Suppressed,
    Completed(RunReport),
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "newswatch_matched_total",
            "Entries matching at least one keyword."
        );
        describe_counter!("newswatch_sent_total", "Messages delivered.");
        describe_counter!(
            "newswatch_dedup_skipped_total",
            "Matched entries skipped by the dedup ledger."
        );
        describe_counter!(
            "newswatch_delivery_errors_total",
            "Failed delivery attempts (alert mode; retried next run)."
        );
    });
}

/// Mode A: streaming alert pass.
///
/// Quiet hours short-circuit everything, including the ledger: a suppressed
/// run does not sweep or persist, so stale entries age out on the next active
/// run instead. Delivery failures are logged and left unmarked so the same
/// entry is retried on the next invocation.
pub async fn run_alert_once(
    cfg: &AppConfig,
    sources: &[Box<dyn FeedSource>],
    notifier: &dyn Notifier,
    ledger_path: &Path,
    now: DateTime<Utc>,
) -> Result<RunOutcome> {
    ensure_metrics_described();

    if is_quiet_now(now, &cfg.quiet_windows) {
        tracing::info!(
            now_kst = %now.with_timezone(&*KST).format("%Y-%m-%d %H:%M"),
            "quiet hours, skipping alert pass"
        );
        return Ok(RunOutcome::Suppressed);
    }

    let now_epoch = now.timestamp().max(0) as u64;
    let mut ledger =
        SentLedger::load(ledger_path).context("loading dedup ledger")?;
    let swept = ledger.sweep_expired(now_epoch, DEFAULT_RETENTION_SECS);
    if swept > 0 {
        tracing::debug!(swept, "expired ledger entries removed");
    }

    let entries = ingest::collect(sources).await;
    let mut report = RunReport {
        collected: entries.len(),
        ..Default::default()
    };

    for entry in &entries {
        if !is_relevant(&entry.title, &entry.summary, &cfg.keywords) {
            continue;
        }
        report.matched += 1;
        counter!("newswatch_matched_total").increment(1);

        let fp = fingerprint(&entry.link);
        if ledger.was_sent(&fp) {
            counter!("newswatch_dedup_skipped_total").increment(1);
            continue;
        }

        let text = render_alert(entry);
        match notifier.send_text(&text).await {
            Ok(()) => {
                ledger.mark_sent(fp, now_epoch);
                report.sent += 1;
                counter!("newswatch_sent_total").increment(1);
            }
            Err(e) => {
                // Not marked sent: the next run retries this link.
                tracing::warn!(error = ?e, link = %entry.link, "delivery failed, will retry next run");
                counter!("newswatch_delivery_errors_total").increment(1);
            }
        }
    }

    // Best-effort persistence: a failed write costs at most duplicate alerts
    // next run, which the retention sweep bounds.
    if let Err(e) = ledger.persist(ledger_path) {
        tracing::error!(error = ?e, path = %ledger_path.display(), "failed to persist dedup ledger");
    }

    tracing::info!(
        collected = report.collected,
        matched = report.matched,
        sent = report.sent,
        "alert pass done"
    );
    Ok(RunOutcome::Completed(report))
}

/// Mode B: digest pass. Stateless across runs; exactly one message.
///
/// Entries without a publish timestamp are excluded here (determinism given a
/// fixed lookback), unlike alert mode which ignores timestamps entirely and
/// lets the ledger bound re-delivery.
pub async fn run_digest_once(
    cfg: &AppConfig,
    sources: &[Box<dyn FeedSource>],
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> Result<RunReport> {
    ensure_metrics_described();

    let entries = ingest::collect(sources).await;
    let collected = entries.len();

    let mut seen_links: HashSet<String> = HashSet::new();
    let mut results: Vec<MatchResult> = Vec::new();

    for entry in entries {
        let Some(published_at) = entry.published_at else {
            continue;
        };
        if !is_within_lookback(published_at, now, cfg.lookback_hours) {
            continue;
        }
        let matched = matched_keywords(&entry.title, &entry.summary, &cfg.keywords);
        if matched.is_empty() {
            continue;
        }
        // Cross-source duplicates count once, first-seen wins.
        if !seen_links.insert(entry.link.clone()) {
            continue;
        }

        counter!("newswatch_matched_total").increment(1);
        let sentiment = sentiment::tag(&format!("{} {}", entry.title, entry.summary));
        results.push(MatchResult {
            entry,
            matched,
            sentiment,
        });
    }

    // Newest first; stable sort keeps first-seen order for equal timestamps.
    results.sort_by(|a, b| b.entry.published_at.cmp(&a.entry.published_at));

    let text = render_digest(&results, cfg, now);
    notifier
        .send_text(&text)
        .await
        .context("digest delivery failed")?;
    counter!("newswatch_sent_total").increment(1);

    let report = RunReport {
        collected,
        matched: results.len(),
        sent: 1,
    };
    tracing::info!(
        collected = report.collected,
        matched = report.matched,
        "digest sent"
    );
    Ok(report)
}

fn render_alert(entry: &FeedEntry) -> String {
    format!(
        "📢 *[뉴스 포착]*\n*제목*: {}\n*링크*: {}",
        entry.title, entry.link
    )
}

/// Digest body: header with KST report date and sentiment totals, then the
/// top-N matches ranked by recency.
fn render_digest(results: &[MatchResult], cfg: &AppConfig, now: DateTime<Utc>) -> String {
    let total = results.len();
    let pos = results
        .iter()
        .filter(|r| r.sentiment == Sentiment::Positive)
        .count();
    let neg = results
        .iter()
        .filter(|r| r.sentiment == Sentiment::Negative)
        .count();
    let neu = total - pos - neg;

    let lines: Vec<String> = results
        .iter()
        .take(cfg.top_n)
        .map(|r| {
            let kws = r
                .matched
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{} [{}] {}\n{}",
                r.sentiment.label(),
                kws,
                r.entry.title,
                r.entry.link
            )
        })
        .collect();

    let report_date = now.with_timezone(&*KST).format("%Y-%m-%d");
    let body = if lines.is_empty() {
        "❌ 해당 키워드 기사 없음".to_string()
    } else {
        lines.join("\n\n")
    };

    format!(
        "📊 *일간 뉴스 리포트* ({report_date}, 최근 {}시간)\n\n총 {total}건  |  📈 {pos}  📉 {neg}  ⚪ {neu}\n\n*Top 기사*\n{body}",
        cfg.lookback_hours
    )
}
