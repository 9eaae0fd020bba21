// src/quiet.rs
//! Time window policy: quiet-hours suppression and the lookback horizon.
//!
//! Quiet hours are evaluated in fixed UTC+9 civil time (KST), not the system
//! local zone, so a run behaves identically on any CI runner.

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use once_cell::sync::Lazy;

pub const MINUTES_PER_DAY: u16 = 1440;

/// Fixed UTC+9 offset used for all civil-time decisions.
pub static KST: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(9 * 3600).expect("UTC+9 is a valid offset"));

/// A suppression interval in minutes-of-day, both ends in `[0, 1440)`.
///
/// If `start_min > end_min` the window wraps past midnight (e.g. 23:30-07:30)
/// and membership is `m >= start || m < end`; otherwise `start <= m < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietWindow {
    pub start_min: u16,
    pub end_min: u16,
}

impl QuietWindow {
    pub fn contains(&self, minute_of_day: u16) -> bool {
        let m = minute_of_day;
        if self.start_min > self.end_min {
            m >= self.start_min || m < self.end_min
        } else {
            self.start_min <= m && m < self.end_min
        }
    }
}

/// Minute-of-day of `now` in KST civil time.
pub fn minute_of_day_kst(now: DateTime<Utc>) -> u16 {
    let local = now.with_timezone(&*KST);
    (local.hour() * 60 + local.minute()) as u16
}

/// True iff any configured window contains the current KST minute-of-day.
pub fn is_quiet_now(now: DateTime<Utc>, windows: &[QuietWindow]) -> bool {
    if windows.is_empty() {
        return false;
    }
    let m = minute_of_day_kst(now);
    windows.iter().any(|w| w.contains(m))
}

/// True iff `published_at` is no older than `lookback_hours` before `now`.
pub fn is_within_lookback(
    published_at: DateTime<Utc>,
    now: DateTime<Utc>,
    lookback_hours: i64,
) -> bool {
    published_at >= now - Duration::hours(lookback_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn kst(h: u32, m: u32) -> DateTime<Utc> {
        // Any date works, only minute-of-day matters.
        KST.with_ymd_and_hms(2025, 3, 10, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn wraparound_window_covers_both_sides_of_midnight() {
        // 23:30-07:30
        let w = QuietWindow {
            start_min: 23 * 60 + 30,
            end_min: 7 * 60 + 30,
        };
        assert!(is_quiet_now(kst(23, 45), &[w]));
        assert!(is_quiet_now(kst(7, 29), &[w]));
        assert!(!is_quiet_now(kst(7, 30), &[w]));
        assert!(!is_quiet_now(kst(12, 0), &[w]));
        // start boundary is inclusive
        assert!(is_quiet_now(kst(23, 30), &[w]));
    }

    #[test]
    fn same_day_window_is_half_open() {
        // 13:00-15:00
        let w = QuietWindow {
            start_min: 13 * 60,
            end_min: 15 * 60,
        };
        assert!(is_quiet_now(kst(13, 0), &[w]));
        assert!(is_quiet_now(kst(14, 59), &[w]));
        assert!(!is_quiet_now(kst(15, 0), &[w]));
        assert!(!is_quiet_now(kst(12, 59), &[w]));
    }

    #[test]
    fn any_window_triggers_suppression() {
        let lunch = QuietWindow {
            start_min: 12 * 60,
            end_min: 13 * 60,
        };
        let night = QuietWindow {
            start_min: 23 * 60,
            end_min: 6 * 60,
        };
        assert!(is_quiet_now(kst(12, 30), &[lunch, night]));
        assert!(is_quiet_now(kst(2, 0), &[lunch, night]));
        assert!(!is_quiet_now(kst(9, 0), &[lunch, night]));
        assert!(!is_quiet_now(kst(9, 0), &[]));
    }

    #[test]
    fn lookback_is_inclusive_at_the_horizon() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let exactly = now - Duration::hours(24);
        let older = now - Duration::hours(24) - Duration::seconds(1);
        let fresh = now - Duration::hours(1);
        assert!(is_within_lookback(exactly, now, 24));
        assert!(!is_within_lookback(older, now, 24));
        assert!(is_within_lookback(fresh, now, 24));
    }
}
