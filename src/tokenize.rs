//! Narrative tokenization.
//!
//! ```text
//! tokenize(text) = { w ∈ words(lowercase(text)) | w ∉ STOPWORDS }
//! ```
//!
//! Words are maximal runs of Unicode word characters (letters, digits,
//! underscore). Punctuation and whitespace are discarded. There is no
//! stemming and no normalization beyond case folding.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Function words ignored when comparing narratives.
///
/// `"re:"` can never match a word token; it is listed for parity with the
/// stopword set rewrites were historically tuned against.
pub const STOPWORDS: [&str; 35] = [
    "the", "a", "an", "and", "or", "but", "of", "to", "in", "on", "for", "with",
    "by", "at", "from", "as", "is", "are", "was", "were", "be", "been", "being",
    "this", "that", "these", "those", "it", "its", "into", "about",
    "regarding", "related", "re", "re:",
];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word pattern"));

/// Check whether a lowercase token is a stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Set of meaningful lowercase tokens.
///
/// Backed by a `BTreeSet` so iteration (and anything logged from it) is
/// sorted and deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check membership.
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Iterate tokens in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tokens in `self` that are absent from `other`.
    pub fn missing_from(&self, other: &TokenSet) -> TokenSet {
        TokenSet(self.0.difference(&other.0).cloned().collect())
    }

    /// Render as space-separated text (sorted).
    pub fn render(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }
}

impl FromIterator<String> for TokenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        TokenSet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for TokenSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        TokenSet(iter.into_iter().map(str::to_string).collect())
    }
}

/// Extract the meaningful token set of a narrative.
pub fn tokenize(text: &str) -> TokenSet {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !is_stopword(w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("Talked to the client about the case.");
        let expected: TokenSet = ["talked", "client", "case"].into_iter().collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ,;.!  ").is_empty());
    }

    #[test]
    fn test_tokenize_only_stopwords() {
        assert!(tokenize("The and of re: regarding, related to it").is_empty());
    }

    #[test]
    fn test_tokenize_case_insensitive_and_deduplicated() {
        let tokens = tokenize("Draft DRAFT draft memo");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains("draft"));
        assert!(tokens.contains("memo"));
    }

    #[test]
    fn test_tokenize_keeps_digits_and_underscores() {
        let tokens = tokenize("Filed motion_v2 on 3/14, ECF-42");
        for t in ["filed", "motion_v2", "3", "14", "ecf", "42"] {
            assert!(tokens.contains(t), "missing {t}");
        }
    }

    #[test]
    fn test_tokenize_unicode_words() {
        let tokens = tokenize("Revisión del contrato für Müller");
        assert!(tokens.contains("revisión"));
        assert!(tokens.contains("müller"));
    }

    #[test]
    fn test_tokenize_idempotent_on_rendered() {
        let text = "Reviewed and revised the settlement agreement; emailed opposing counsel.";
        let once = tokenize(text);
        assert_eq!(tokenize(&once.render()), once);
    }

    #[test]
    fn test_missing_from() {
        let a = tokenize("client case strategy");
        let b = tokenize("client strategy memo");
        let missing = a.missing_from(&b);
        assert_eq!(missing.render(), "case");
    }
}
