// src/ledger.rs
//! Persistent dedup ledger: link fingerprint -> epoch seconds of the last
//! successful delivery.
//!
//! On-disk format: `{ "sent": { "<fingerprint>": <epochSeconds>, ... } }`.
//! The ledger is loaded once at run start, mutated in memory, swept for
//! expired entries, and written back with write-new-then-rename so a crash
//! mid-write never corrupts the previous state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Default retention window: a fingerprint blocks re-delivery for 24h.
pub const DEFAULT_RETENTION_SECS: u64 = 24 * 3600;

/// Stable SHA-256 hex fingerprint of a canonical link. Keeps ledger keys
/// bounded regardless of link length.
pub fn fingerprint(link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SentLedger {
    pub sent: HashMap<String, u64>,
}

impl SentLedger {
    /// Load the ledger from `path`. A missing file yields an empty ledger
    /// (first run, or state was garbage-collected); a present-but-malformed
    /// file is a hard error so silent data loss never goes unnoticed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading sent ledger from {}", path.display()))?;
        let ledger: SentLedger = serde_json::from_str(&raw)
            .with_context(|| format!("parsing sent ledger {}", path.display()))?;
        Ok(ledger)
    }

    /// Drop every entry older than `retention_secs`. Must run once per alert
    /// pass, before any `was_sent` lookup, so a fingerprint can legitimately
    /// re-fire after retention elapses. Returns the number of entries removed.
    pub fn sweep_expired(&mut self, now_epoch: u64, retention_secs: u64) -> usize {
        let before = self.sent.len();
        self.sent
            .retain(|_, last_sent| now_epoch.saturating_sub(*last_sent) <= retention_secs);
        before - self.sent.len()
    }

    pub fn was_sent(&self, fingerprint: &str) -> bool {
        self.sent.contains_key(fingerprint)
    }

    pub fn mark_sent(&mut self, fingerprint: String, now_epoch: u64) {
        self.sent.insert(fingerprint, now_epoch);
    }

    /// Durable write: serialize next to the target and rename over it, so the
    /// next run sees either the old ledger or the new one, never a torn file.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing sent ledger")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("writing ledger temp file {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("replacing ledger at {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_distinct() {
        let a = fingerprint("https://example.com/a");
        let b = fingerprint("https://example.com/b");
        assert_eq!(a, fingerprint("https://example.com/a"));
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let mut ledger = SentLedger::default();
        ledger.mark_sent("old".into(), 1_000);
        ledger.mark_sent("fresh".into(), 90_000);
        let removed = ledger.sweep_expired(100_000, DEFAULT_RETENTION_SECS);
        assert_eq!(removed, 1);
        assert!(!ledger.was_sent("old"));
        assert!(ledger.was_sent("fresh"));
    }

    #[test]
    fn sweep_keeps_entry_exactly_at_retention() {
        let mut ledger = SentLedger::default();
        ledger.mark_sent("edge".into(), 0);
        assert_eq!(ledger.sweep_expired(DEFAULT_RETENTION_SECS, DEFAULT_RETENTION_SECS), 0);
        assert!(ledger.was_sent("edge"));
    }
}
