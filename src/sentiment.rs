// src/sentiment.rs
//! Coarse sentiment tagging over two fixed lexicons.
//!
//! Policy: **exclusive count**. Count how many positive lexicon terms appear
//! in the text vs how many negative ones (each term counted once, substring,
//! case-insensitive). Positive iff pos > neg and pos > 0; Negative iff
//! neg > pos and neg > 0; Neutral otherwise, including a tie with both
//! present. This resolves the "both present" case explicitly instead of by
//! lexicon scan order.

use serde::{Deserialize, Serialize};

/// Korean terms first (the feeds this watcher was built for), then English
/// equivalents so English-language sources tag too.
static POSITIVE_TERMS: &[&str] = &[
    "수주", "증가", "확대", "성장", "상승", "개선", "호조", "흑자", "beat", "growth", "surge",
    "rally", "record high", "upgrade", "expand",
];

static NEGATIVE_TERMS: &[&str] = &[
    "감소", "하락", "적자", "축소", "우려", "재고 증가", "둔화", "리스크", "miss", "decline",
    "slump", "loss", "downgrade", "slowdown", "risk",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Label used in rendered digest lines, matching the report format.
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "📈 긍정",
            Sentiment::Negative => "📉 부정",
            Sentiment::Neutral => "⚪ 중립",
        }
    }
}

/// Tag `text` with the exclusive-count policy described in the module docs.
pub fn tag(text: &str) -> Sentiment {
    let t = text.to_lowercase();
    let pos = POSITIVE_TERMS.iter().filter(|term| t.contains(*term)).count();
    let neg = NEGATIVE_TERMS.iter().filter(|term| t.contains(*term)).count();

    if pos > neg && pos > 0 {
        Sentiment::Positive
    } else if neg > pos && neg > 0 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_positive_no_negative_is_positive() {
        assert_eq!(tag("수주 증가 소식"), Sentiment::Positive);
        assert_eq!(tag("Record high after earnings beat"), Sentiment::Positive);
    }

    #[test]
    fn majority_negative_is_negative() {
        assert_eq!(tag("실적 하락, 적자 전환 우려"), Sentiment::Negative);
        assert_eq!(tag("Shares slump on earnings miss"), Sentiment::Negative);
    }

    #[test]
    fn tie_with_both_present_is_neutral() {
        // One positive term, one negative term.
        assert_eq!(tag("수주 증가했지만 리스크 우려"), Sentiment::Neutral); // 2 vs 2
        assert_eq!(tag("성장 둔화"), Sentiment::Neutral); // 1 vs 1
    }

    #[test]
    fn no_lexicon_hit_is_neutral() {
        assert_eq!(tag(""), Sentiment::Neutral);
        assert_eq!(tag("Quarterly report scheduled for Tuesday"), Sentiment::Neutral);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(tag("GROWTH SURGE in data centers"), Sentiment::Positive);
    }
}
