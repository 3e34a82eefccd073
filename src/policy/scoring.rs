//! Drift scoring between an original narrative and a rewrite.
//!
//! Formula:
//! ```text
//! O = tokenize(original), R = tokenize(rewritten)
//! missing = O - R
//! overlap_ratio = 1 - |missing| / |O|
//! drift = overlap_ratio < min_overlap  ||  (missing ∩ must_preserve) ≠ ∅
//! ```
//!
//! An original with no meaningful tokens has nothing to lose: its ratio is
//! 1.0 and it never drifts.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::v1::DriftPolicy;
use crate::tokenize::{tokenize, TokenSet};

/// Full drift measurement for one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Number of distinct meaningful tokens in the original.
    pub original_token_count: usize,
    /// Original tokens absent from the rewrite.
    pub missing: TokenSet,
    /// Fraction of original tokens kept.
    pub overlap_ratio: f64,
    /// Must-preserve tokens present in the original but dropped.
    pub dropped_must_preserve: Vec<String>,
    /// Ratio fell strictly below the policy threshold.
    pub below_threshold: bool,
}

impl DriftReport {
    /// Measure drift of `rewritten` against `original` under `policy`.
    pub fn compute(original: &str, rewritten: &str, policy: &DriftPolicy) -> Self {
        let original_tokens = tokenize(original);
        if original_tokens.is_empty() {
            return Self {
                original_token_count: 0,
                missing: TokenSet::default(),
                overlap_ratio: 1.0,
                dropped_must_preserve: Vec::new(),
                below_threshold: false,
            };
        }

        let missing = original_tokens.missing_from(&tokenize(rewritten));
        let overlap_ratio = 1.0 - (missing.len() as f64 / original_tokens.len() as f64);
        let dropped_must_preserve = missing
            .iter()
            .filter(|t| policy.is_must_preserve(t))
            .map(str::to_string)
            .collect();

        Self {
            original_token_count: original_tokens.len(),
            missing,
            overlap_ratio,
            dropped_must_preserve,
            below_threshold: overlap_ratio < policy.min_overlap,
        }
    }

    /// Whether the rewrite should be rejected.
    pub fn is_drift(&self) -> bool {
        self.below_threshold || !self.dropped_must_preserve.is_empty()
    }
}

static DEFAULT_POLICY: Lazy<DriftPolicy> = Lazy::new(DriftPolicy::default);

/// Check `rewritten` against `original` under the default policy.
pub fn too_much_drift(original: &str, rewritten: &str) -> bool {
    too_much_drift_with(original, rewritten, &DEFAULT_POLICY)
}

/// Check `rewritten` against `original` under an explicit policy.
pub fn too_much_drift_with(original: &str, rewritten: &str, policy: &DriftPolicy) -> bool {
    DriftReport::compute(original, rewritten, policy).is_drift()
}
