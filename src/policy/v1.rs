//! Drift policy v1: overlap threshold plus must-preserve override.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! The overlap threshold is quantized to an integer before hashing
//! (multiply by 1e6 and round to i64) so `params_hash` does not depend on
//! float formatting.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::DEFAULT_POLICY_VERSION;

/// Minimum fraction of original tokens a rewrite must keep.
///
/// Deliberately permissive: only radical rewrites fall below it. The
/// comparison is strict, so a ratio of exactly 0.30 is accepted.
pub const DRIFT_MIN_OVERLAP: f64 = 0.30;

/// Flagged terms that must never silently disappear from a rewrite.
pub const MUST_PRESERVE_TOKENS: [&str; 5] = ["farts", "butt", "toilet", "poop", "nsfw"];

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

fn quantize_float(value: f64) -> i64 {
    (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
}

#[derive(Debug, Clone, Serialize)]
struct QuantizedPolicyParams<'a> {
    version: &'a str,
    min_overlap: i64,
    must_preserve: &'a BTreeSet<String>,
}

/// Drift policy.
///
/// ## Parameters
///
/// - `min_overlap`: soft threshold; ratios strictly below it are drift
/// - `must_preserve`: hard override; dropping any of these is drift
///   regardless of the ratio
///
/// The default policy uses [`DRIFT_MIN_OVERLAP`] and
/// [`MUST_PRESERVE_TOKENS`]. Policies are immutable once built and are
/// shared by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Minimum overlap ratio (0.0-1.0).
    pub min_overlap: f64,
    /// Lowercase tokens that may never be dropped.
    pub must_preserve: BTreeSet<String>,
}

impl DriftPolicy {
    /// Create a policy with custom parameters.
    ///
    /// `min_overlap` is clamped to `0.0..=1.0`; must-preserve tokens are
    /// lowercased to match tokenizer output.
    pub fn new<I, S>(min_overlap: f64, must_preserve: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            min_overlap: min_overlap.clamp(0.0, 1.0),
            must_preserve: must_preserve
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Check whether a token is on the must-preserve list.
    pub fn is_must_preserve(&self, token: &str) -> bool {
        self.must_preserve.contains(token)
    }

    /// Compute a hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&QuantizedPolicyParams {
            version: &self.version,
            min_overlap: quantize_float(self.min_overlap),
            must_preserve: &self.must_preserve,
        })
    }
}

impl Default for DriftPolicy {
    fn default() -> Self {
        Self::new(DRIFT_MIN_OVERLAP, MUST_PRESERVE_TOKENS)
    }
}
