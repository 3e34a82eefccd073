//! Rewrite validation pipeline.
//!
//! ## Stages
//!
//! ```text
//! raw output → Parse → Schema → Trim → Drift → Accept
//!                │        │               │
//!                └────────┴───────────────┴──→ Fallback
//! ```
//!
//! The pipeline is linear and never returns an error: every input yields a
//! complete [`RewriteResult`]. When a stage rejects the model output, the
//! deterministic fallback is returned and the [`Disposition`] records why.
//!
//! ## Drift-Check Asymmetry
//!
//! Only the `standard` variant is drift-checked. A `standard` rewrite that
//! keeps the original's meaning is taken as evidence that `client_compliant`
//! and `audit_safe` do too; those two variants are returned unchecked.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::extract::extract_json;
use crate::fallback::simple_fallback_rewrite;
use crate::policy::{DriftPolicy, DriftReport};
use crate::types::{ClientRules, Disposition, RejectionReason, RewriteCandidate, RewriteResult};

/// Result of validating one model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// The rewrite to hand to the caller.
    pub result: RewriteResult,
    /// Whether the model output was used, and if not, why.
    pub disposition: Disposition,
}

impl ValidationOutcome {
    /// Outcome for trusted model output.
    pub fn accepted(result: RewriteResult) -> Self {
        Self {
            result,
            disposition: Disposition::Accepted,
        }
    }

    /// Fallback outcome for `original`.
    pub fn fallback(original: &str, reason: RejectionReason) -> Self {
        warn!(
            target: "rewrite_kernel::validator",
            reason = reason.label(),
            detail = %reason,
            "model rewrite rejected, using fallback"
        );
        Self {
            result: simple_fallback_rewrite(original),
            disposition: Disposition::Fallback { reason },
        }
    }
}

/// Stateless validator bound to a drift policy.
///
/// Cheap to clone and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct RewriteValidator {
    policy: DriftPolicy,
}

impl RewriteValidator {
    /// Create a validator with a custom drift policy.
    pub fn new(policy: DriftPolicy) -> Self {
        Self { policy }
    }

    /// The drift policy in force.
    pub fn policy(&self) -> &DriftPolicy {
        &self.policy
    }

    /// Run the full pipeline over `raw_model_output`.
    pub fn evaluate(&self, original: &str, raw_model_output: &str) -> ValidationOutcome {
        let object = match extract_json(raw_model_output) {
            Ok(object) => object,
            Err(e) => {
                debug!(target: "rewrite_kernel::validator", error = %e, "parse stage failed");
                return ValidationOutcome::fallback(original, RejectionReason::MalformedOutput);
            }
        };

        let candidate = match RewriteCandidate::from_object(&object) {
            Ok(candidate) => candidate,
            Err((field, problem)) => {
                return ValidationOutcome::fallback(
                    original,
                    RejectionReason::SchemaViolation {
                        field: field.to_string(),
                        problem,
                    },
                );
            }
        };

        let report = DriftReport::compute(original, &candidate.standard, &self.policy);
        if report.is_drift() {
            return ValidationOutcome::fallback(
                original,
                RejectionReason::ExcessiveDrift {
                    overlap_ratio: report.overlap_ratio,
                    dropped_must_preserve: report.dropped_must_preserve,
                },
            );
        }

        debug!(
            target: "rewrite_kernel::validator",
            overlap_ratio = report.overlap_ratio,
            missing = report.missing.len(),
            "model rewrite accepted"
        );
        ValidationOutcome::accepted(candidate.into_result())
    }

    /// Outcome for a model call that never produced output.
    pub fn transport_failure(&self, original: &str, message: impl Into<String>) -> ValidationOutcome {
        ValidationOutcome::fallback(
            original,
            RejectionReason::Transport {
                message: message.into(),
            },
        )
    }
}

/// Validate a raw model response under the default drift policy.
///
/// `hours` and `rules` only shape the prompt; they do not influence
/// acceptance. They are part of the signature so callers can pass the same
/// values they prompted with.
pub fn validate_rewrite(
    original: &str,
    hours: f64,
    rules: Option<&ClientRules>,
    raw_model_output: &str,
) -> RewriteResult {
    debug!(
        target: "rewrite_kernel::validator",
        hours = hours,
        has_rules = rules.is_some(),
        output_len = raw_model_output.len(),
        "validating model rewrite"
    );
    RewriteValidator::default()
        .evaluate(original, raw_model_output)
        .result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FALLBACK_NOTE;
    use crate::types::FieldProblem;

    fn output(standard: &str) -> String {
        serde_json::json!({
            "standard": standard,
            "client_compliant": format!("{standard} (client)"),
            "audit_safe": format!("{standard} (audit)"),
            "notes": "ok",
        })
        .to_string()
    }

    #[test]
    fn test_accepts_faithful_rewrite() {
        let outcome = RewriteValidator::default()
            .evaluate("reviewed lease agreement", &output("Reviewed the lease agreement."));
        assert!(outcome.disposition.is_accepted());
        assert_eq!(outcome.result.standard, "Reviewed the lease agreement.");
        assert_eq!(outcome.result.notes, "ok");
    }

    #[test]
    fn test_malformed_output_reason() {
        let outcome = RewriteValidator::default().evaluate("reviewed lease", "not json");
        assert_eq!(
            outcome.disposition.reason(),
            Some(&RejectionReason::MalformedOutput)
        );
        assert_eq!(outcome.result.standard, "Reviewed lease.");
        assert_eq!(outcome.result.notes, FALLBACK_NOTE);
    }

    #[test]
    fn test_schema_violation_reason() {
        let raw = r#"{"standard": "a", "client_compliant": "b"}"#;
        let outcome = RewriteValidator::default().evaluate("reviewed lease", raw);
        assert_eq!(
            outcome.disposition.reason(),
            Some(&RejectionReason::SchemaViolation {
                field: "audit_safe".into(),
                problem: FieldProblem::Missing,
            })
        );
    }

    #[test]
    fn test_excessive_drift_reason() {
        let outcome = RewriteValidator::default()
            .evaluate("reviewed lease agreement terms", &output("Attended hearing."));
        match outcome.disposition.reason() {
            Some(RejectionReason::ExcessiveDrift { overlap_ratio, dropped_must_preserve }) => {
                assert_eq!(*overlap_ratio, 0.0);
                assert!(dropped_must_preserve.is_empty());
            }
            other => panic!("Expected ExcessiveDrift, got {other:?}"),
        }
    }

    #[test]
    fn test_only_standard_is_drift_checked() {
        let raw = serde_json::json!({
            "standard": "Reviewed lease agreement.",
            "client_compliant": "Attended hearing.",
            "audit_safe": "Something else entirely.",
        })
        .to_string();
        let outcome = RewriteValidator::default().evaluate("reviewed lease agreement", &raw);
        assert!(outcome.disposition.is_accepted());
        assert_eq!(outcome.result.client_compliant, "Attended hearing.");
        assert_eq!(outcome.result.notes, "");
    }

    #[test]
    fn test_custom_policy_used() {
        let validator = RewriteValidator::new(DriftPolicy::new(1.0, Vec::<String>::new()));
        let outcome = validator.evaluate("reviewed lease agreement", &output("Reviewed lease."));
        assert!(!outcome.disposition.is_accepted());
    }

    #[test]
    fn test_transport_failure_outcome() {
        let outcome = RewriteValidator::default().transport_failure("met client", "timed out");
        assert_eq!(outcome.disposition.label(), "transport");
        assert_eq!(outcome.result.standard, "Met client.");
    }
}
