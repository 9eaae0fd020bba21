//! newswatch — Binary entrypoint.
//!
//! One-shot, externally scheduled (cron/CI). `newswatch alert` streams
//! per-entry notifications with dedup; `newswatch digest` sends one ranked
//! summary. `--interval <secs>` wraps the single-pass core in a loop for
//! local watch runs; it is a convenience, not part of the core design.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newswatch::config::{self, load_config};
use newswatch::ingest::providers::rss::RssFeedSource;
use newswatch::ingest::types::FeedSource;
use newswatch::notify::slack::SlackNotifier;
use newswatch::pipeline::{run_alert_once, run_digest_once, RunOutcome};

const ENV_STATE_PATH: &str = "NEWSWATCH_STATE_PATH";
const DEFAULT_STATE_PATH: &str = "state.json";

// Exit codes: 2 = configuration error (before any network activity),
// 1 = run failure (e.g. digest delivery), 0 = success (per-item failures
// are informational counts).
const EXIT_CONFIG: u8 = 2;
const EXIT_RUN: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Alert,
    Digest,
}

struct CliArgs {
    mode: Mode,
    interval_secs: Option<u64>,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut mode = Mode::Alert;
    let mut interval_secs = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "alert" => mode = Mode::Alert,
            "digest" => mode = Mode::Digest,
            "--interval" => {
                let v = args
                    .next()
                    .ok_or_else(|| "--interval requires a value in seconds".to_string())?;
                let secs: u64 = v
                    .parse()
                    .map_err(|_| format!("invalid --interval value: {v}"))?;
                interval_secs = Some(secs.max(1));
            }
            other => return Err(format!("unknown argument: {other} (expected alert|digest)")),
        }
    }
    Ok(CliArgs {
        mode,
        interval_secs,
    })
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newswatch=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn state_path() -> PathBuf {
    std::env::var(ENV_STATE_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH))
}

async fn run_pass(
    mode: Mode,
    cfg: &newswatch::AppConfig,
    sources: &[Box<dyn FeedSource>],
    notifier: &SlackNotifier,
    ledger_path: &std::path::Path,
) -> anyhow::Result<()> {
    let now = Utc::now();
    match mode {
        Mode::Alert => match run_alert_once(cfg, sources, notifier, ledger_path, now).await? {
            RunOutcome::Suppressed => {
                // Distinct, observable early exit; nothing was fetched or sent.
            }
            RunOutcome::Completed(_) => {}
        },
        Mode::Digest => {
            run_digest_once(cfg, sources, notifier, now).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("usage: newswatch [alert|digest] [--interval <secs>]\n{e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    // Everything that can be validated happens before any network call.
    let config_path = config::default_config_path();
    let cfg = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = ?e, path = %config_path.display(), "configuration error");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    let notifier = match SlackNotifier::from_env() {
        Ok(n) => n,
        Err(e) => {
            tracing::error!(error = ?e, "delivery endpoint missing");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if cfg.rss_feeds.is_empty() {
        tracing::warn!("no rss_feeds configured, nothing to collect");
    }

    let mut sources: Vec<Box<dyn FeedSource>> = Vec::with_capacity(cfg.rss_feeds.len());
    for url in &cfg.rss_feeds {
        match RssFeedSource::from_url(url.clone()) {
            Ok(src) => sources.push(Box::new(src)),
            Err(e) => {
                tracing::error!(error = ?e, url = %url, "failed to build feed source");
                return ExitCode::from(EXIT_CONFIG);
            }
        }
    }

    let ledger_path = state_path();

    match args.interval_secs {
        None => {
            if let Err(e) = run_pass(args.mode, &cfg, &sources, &notifier, &ledger_path).await {
                tracing::error!(error = ?e, "run failed");
                return ExitCode::from(EXIT_RUN);
            }
            ExitCode::SUCCESS
        }
        Some(secs) => {
            // Watch wrapper: repeatedly invoke the single-pass pipeline.
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(secs));
            loop {
                ticker.tick().await;
                if let Err(e) = run_pass(args.mode, &cfg, &sources, &notifier, &ledger_path).await {
                    tracing::error!(error = ?e, "pass failed, continuing watch loop");
                }
            }
        }
    }
}
