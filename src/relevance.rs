// src/relevance.rs
//! Keyword relevance gate: case-insensitive substring containment of each
//! configured keyword against an entry's title and summary.
//!
//! Matching is deliberately substring-based, not tokenized: a keyword that is
//! a substring of an unrelated word still matches. That false-positive
//! tolerance is part of the contract, not a bug.

/// Returns every keyword that appears in `title` or `summary`, preserving the
/// configured keyword order. Blank keywords are skipped.
pub fn matched_keywords(title: &str, summary: &str, keywords: &[String]) -> Vec<String> {
    if keywords.is_empty() {
        return Vec::new();
    }
    let t = title.to_lowercase();
    let s = summary.to_lowercase();

    let mut matched = Vec::new();
    for kw in keywords {
        let k = kw.trim().to_lowercase();
        if k.is_empty() {
            continue;
        }
        if t.contains(&k) || s.contains(&k) {
            matched.push(kw.clone());
        }
    }
    matched
}

/// Convenience predicate for the alert path, which only needs yes/no.
pub fn is_relevant(title: &str, summary: &str, keywords: &[String]) -> bool {
    !matched_keywords(title, summary, keywords).is_empty()
}
