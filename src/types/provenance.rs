//! Audit provenance for engine rewrites.
//!
//! Every rewrite produced by the engine carries enough context to reconstruct
//! how it was made: which drift policy judged it, which model produced the
//! raw output, the exact rules sent in the prompt, a content hash of the
//! narrative, and whether the model output was trusted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rejection::Disposition;
use super::request::ClientRules;
use super::rewrite::RewriteResult;
use crate::canonical::{compute_content_hash, to_canonical_bytes};
use crate::policy::DriftPolicy;

/// Provenance record attached to an engine rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteProvenance {
    /// Drift policy identifier.
    pub policy_id: String,
    /// Hash of the drift policy parameters.
    pub policy_params_hash: String,
    /// Model backend name.
    pub model_name: String,
    /// Canonical JSON of the rules sent in the prompt (`{}` when none).
    pub rules_snapshot: String,
    /// SHA-256 hex of the normalized narrative.
    pub original_hash: String,
    /// Accepted, or the reason for falling back.
    pub disposition: Disposition,
    /// When validation finished.
    pub validated_at: DateTime<Utc>,
}

impl RewriteProvenance {
    /// Record provenance for a completed validation.
    pub fn record(
        policy: &DriftPolicy,
        model_name: &str,
        rules: Option<&ClientRules>,
        original: &str,
        disposition: Disposition,
    ) -> Self {
        Self {
            policy_id: policy.policy_id().to_string(),
            policy_params_hash: policy.params_hash(),
            model_name: model_name.to_string(),
            rules_snapshot: rules_snapshot(rules),
            original_hash: compute_content_hash(original),
            disposition,
            validated_at: Utc::now(),
        }
    }
}

/// Canonical JSON text of the rules, `{}` when absent.
pub fn rules_snapshot(rules: Option<&ClientRules>) -> String {
    match rules {
        // serde_json maps are BTreeMap-backed, so key order is stable
        Some(rules) => String::from_utf8(to_canonical_bytes(rules)).unwrap_or_default(),
        None => "{}".to_string(),
    }
}

/// A rewrite together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditedRewrite {
    /// The rewrite returned to the caller.
    pub result: RewriteResult,
    /// How it was produced.
    pub provenance: RewriteProvenance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rules_snapshot_absent() {
        assert_eq!(rules_snapshot(None), "{}");
    }

    #[test]
    fn test_rules_snapshot_is_key_ordered() {
        let rules = json!({"no_block_billing": true, "max_hours": 8})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(
            rules_snapshot(Some(&rules)),
            r#"{"max_hours":8,"no_block_billing":true}"#
        );
    }

    #[test]
    fn test_record_hashes_normalized_original() {
        let policy = DriftPolicy::default();
        let a = RewriteProvenance::record(&policy, "m", None, "met client", Disposition::Accepted);
        let b = RewriteProvenance::record(&policy, "m", None, "  met client\n", Disposition::Accepted);
        assert_eq!(a.original_hash, b.original_hash);
        assert_eq!(a.original_hash.len(), 64);
        assert_eq!(a.policy_params_hash, policy.params_hash());
    }
}
