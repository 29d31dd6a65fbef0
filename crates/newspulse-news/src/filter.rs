//! Relevance and duplicate filtering applied to every feed entry.

use std::collections::HashSet;

/// Returns `true` when the company name appears, case-insensitively, in the
/// title or the description.
///
/// This is a plain substring test: "Tata" matches "Tatable", and an alias or
/// ticker symbol never matches.
#[must_use]
pub fn is_relevant(company: &str, title: &str, description: &str) -> bool {
    let company = company.to_lowercase();
    title.to_lowercase().contains(&company) || description.to_lowercase().contains(&company)
}

/// Titles already accepted into the current report.
///
/// Comparison is exact: titles differing only in case or inner whitespace are
/// treated as distinct.
#[derive(Debug, Default)]
pub struct TitleDeduplicator {
    seen: HashSet<String>,
}

impl TitleDeduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `title` and returns `true`, or returns `false` if it was seen before.
    pub fn admit(&mut self, title: &str) -> bool {
        if self.seen.contains(title) {
            return false;
        }
        self.seen.insert(title.to_owned())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_title_case_insensitively() {
        assert!(is_relevant("Acme", "ACME posts record profit", "No summary available"));
    }

    #[test]
    fn matches_description_only() {
        assert!(is_relevant("acme", "Quarterly roundup", "Shares of Acme Corp rose"));
    }

    #[test]
    fn rejects_unrelated_article() {
        assert!(!is_relevant("Acme", "Markets close higher", "Stocks rallied"));
    }

    #[test]
    fn accepts_substring_false_positive() {
        assert!(is_relevant("Tata", "Tatable furniture launch", ""));
    }

    #[test]
    fn multi_word_company_must_appear_contiguously() {
        assert!(is_relevant("Tata Motors", "tata motors unveils EV", ""));
        assert!(!is_relevant("Tata Motors", "Tata Steel and Motors", ""));
    }

    #[test]
    fn deduplicator_rejects_repeat() {
        let mut seen = TitleDeduplicator::new();
        assert!(seen.admit("Acme news update"));
        assert!(!seen.admit("Acme news update"));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn deduplicator_is_case_sensitive() {
        let mut seen = TitleDeduplicator::new();
        assert!(seen.admit("Acme news update"));
        assert!(seen.admit("ACME NEWS UPDATE"));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn new_deduplicator_is_empty() {
        assert!(TitleDeduplicator::new().is_empty());
    }
}
