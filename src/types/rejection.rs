//! Rejection reasons and pipeline dispositions.
//!
//! ## Propagation Policy
//!
//! Rejections never cross the pipeline boundary as errors. Each one is
//! logged and converted into the fallback result; callers that care about
//! *why* the fallback was used read the [`Disposition`] on a
//! [`ValidationOutcome`](crate::validator::ValidationOutcome).
//!
//! | Reason | Stage | Trigger |
//! |--------|-------|---------|
//! | `Transport` | acquisition | model backend failed or timed out |
//! | `MalformedOutput` | parse | no JSON object, even after brace slicing |
//! | `SchemaViolation` | schema | required variant missing or not a string |
//! | `ExcessiveDrift` | drift | overlap too low, or a must-preserve token dropped |

use serde::{Deserialize, Serialize};

use super::rewrite::FieldProblem;

/// Why model output was not trusted.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    /// The model backend could not produce output.
    #[error("model transport failed: {message}")]
    Transport {
        /// Backend error text.
        message: String,
    },

    /// Output is not parseable as a JSON object.
    #[error("model output is not a JSON object")]
    MalformedOutput,

    /// A required field is missing or has the wrong type.
    #[error("model output field `{field}` is {problem}")]
    SchemaViolation {
        /// Offending field name.
        field: String,
        /// What was wrong with it.
        problem: FieldProblem,
    },

    /// The `standard` variant drifted too far from the original.
    #[error("rewrite drifted from original (overlap {overlap_ratio:.2}, dropped {dropped_must_preserve:?})")]
    ExcessiveDrift {
        /// Fraction of original tokens kept in the rewrite.
        overlap_ratio: f64,
        /// Must-preserve tokens that were silently removed.
        dropped_must_preserve: Vec<String>,
    },
}

impl RejectionReason {
    /// Short machine-readable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::MalformedOutput => "malformed_output",
            Self::SchemaViolation { .. } => "schema_violation",
            Self::ExcessiveDrift { .. } => "excessive_drift",
        }
    }
}

/// What the pipeline did with the model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Disposition {
    /// Model output was trusted and returned (trimmed).
    Accepted,
    /// Model output was discarded in favour of the fallback rewrite.
    Fallback {
        /// Why the output was discarded.
        reason: RejectionReason,
    },
}

impl Disposition {
    /// Whether the model output was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// The rejection reason, if the fallback was used.
    pub fn reason(&self) -> Option<&RejectionReason> {
        match self {
            Self::Accepted => None,
            Self::Fallback { reason } => Some(reason),
        }
    }

    /// Metric label: `accepted` or the rejection label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Fallback { reason } => reason.label(),
        }
    }
}
