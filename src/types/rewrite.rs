//! Rewrite result and candidate types.
//!
//! A [`RewriteResult`] is what callers receive from the pipeline. Every field
//! is always populated: a result built from trusted model output and a
//! result built by the fallback composer have the same shape.
//!
//! A [`RewriteCandidate`] is the model's proposal after schema checking and
//! trimming, before the drift check decides whether to trust it.

use serde::{Deserialize, Serialize};

/// Four-field rewrite of a time entry narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    /// Cleaned version of the narrative.
    pub standard: String,
    /// Version tuned to the client's billing rules.
    pub client_compliant: String,
    /// Version that is extra clear and defensible in audits.
    pub audit_safe: String,
    /// Explanation of what changed. May be empty.
    pub notes: String,
}

impl RewriteResult {
    /// Create a result from its four fields.
    pub fn new(
        standard: impl Into<String>,
        client_compliant: impl Into<String>,
        audit_safe: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            standard: standard.into(),
            client_compliant: client_compliant.into(),
            audit_safe: audit_safe.into(),
            notes: notes.into(),
        }
    }
}

/// Model-proposed rewrite that passed the schema stage.
///
/// All fields are already trimmed. Construct via
/// [`RewriteCandidate::from_object`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteCandidate {
    /// Proposed `standard` variant.
    pub standard: String,
    /// Proposed `client_compliant` variant.
    pub client_compliant: String,
    /// Proposed `audit_safe` variant.
    pub audit_safe: String,
    /// Proposed notes (empty when the model omitted them).
    pub notes: String,
}

/// Required string fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 3] = ["standard", "client_compliant", "audit_safe"];

impl RewriteCandidate {
    /// Build a candidate from a parsed JSON object.
    ///
    /// The three variant fields must be JSON strings. `notes` is optional:
    /// an absent one becomes the empty string, and a non-string value is
    /// replaced by its compact JSON text (`true`, `null`, `1.5`,
    /// `{"a":1}`), not a host-language repr such as `True` or `None`.
    ///
    /// # Errors
    /// Returns the name of the first offending field and what was wrong with it.
    pub fn from_object(
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, (&'static str, FieldProblem)> {
        let mut variants = [String::new(), String::new(), String::new()];
        for (slot, field) in variants.iter_mut().zip(REQUIRED_FIELDS) {
            match object.get(field) {
                Some(serde_json::Value::String(s)) => *slot = s.trim().to_string(),
                Some(_) => return Err((field, FieldProblem::NotAString)),
                None => return Err((field, FieldProblem::Missing)),
            }
        }

        let notes = match object.get("notes") {
            None => String::new(),
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string().trim().to_string(),
        };

        let [standard, client_compliant, audit_safe] = variants;
        Ok(Self {
            standard,
            client_compliant,
            audit_safe,
            notes,
        })
    }

    /// Accept the candidate as the final result.
    pub fn into_result(self) -> RewriteResult {
        RewriteResult {
            standard: self.standard,
            client_compliant: self.client_compliant,
            audit_safe: self.audit_safe,
            notes: self.notes,
        }
    }
}

/// Why a required field failed the schema stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    /// Key absent from the object.
    Missing,
    /// Key present but its value is not a string.
    NotAString,
}

impl std::fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::NotAString => write!(f, "not a string"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_candidate_trims_all_fields() {
        let obj = object(json!({
            "standard": "  Reviewed file. ",
            "client_compliant": "\nReviewed file for client.\n",
            "audit_safe": " Reviewed case file. ",
            "notes": "  tightened wording  ",
        }));

        let candidate = RewriteCandidate::from_object(&obj).unwrap();
        assert_eq!(candidate.standard, "Reviewed file.");
        assert_eq!(candidate.client_compliant, "Reviewed file for client.");
        assert_eq!(candidate.audit_safe, "Reviewed case file.");
        assert_eq!(candidate.notes, "tightened wording");
    }

    #[test]
    fn test_candidate_missing_field() {
        let obj = object(json!({"standard": "a", "client_compliant": "b"}));
        let err = RewriteCandidate::from_object(&obj).unwrap_err();
        assert_eq!(err, ("audit_safe", FieldProblem::Missing));
    }

    #[test]
    fn test_candidate_wrong_type() {
        let obj = object(json!({"standard": 3, "client_compliant": "b", "audit_safe": "c"}));
        let err = RewriteCandidate::from_object(&obj).unwrap_err();
        assert_eq!(err, ("standard", FieldProblem::NotAString));
    }

    #[test]
    fn test_candidate_notes_optional() {
        let obj = object(json!({"standard": "a", "client_compliant": "b", "audit_safe": "c"}));
        let candidate = RewriteCandidate::from_object(&obj).unwrap();
        assert_eq!(candidate.notes, "");
    }

    #[test]
    fn test_candidate_notes_coerced() {
        let obj = object(json!({
            "standard": "a",
            "client_compliant": "b",
            "audit_safe": "c",
            "notes": ["x", 1],
        }));
        let candidate = RewriteCandidate::from_object(&obj).unwrap();
        assert_eq!(candidate.notes, r#"["x",1]"#);
    }

    #[test]
    fn test_scalar_and_object_notes_use_json_text() {
        let cases = [
            (json!(true), "true"),
            (json!(1.5), "1.5"),
            (json!({"a": 1}), r#"{"a":1}"#),
        ];
        for (notes, expected) in cases {
            let obj = object(json!({
                "standard": "a",
                "client_compliant": "b",
                "audit_safe": "c",
                "notes": notes,
            }));
            let candidate = RewriteCandidate::from_object(&obj).unwrap();
            assert_eq!(candidate.notes, expected);
        }
    }

    #[test]
    fn test_null_notes_coerced() {
        let obj = object(json!({
            "standard": "a",
            "client_compliant": "b",
            "audit_safe": "c",
            "notes": null,
        }));
        let candidate = RewriteCandidate::from_object(&obj).unwrap();
        assert_eq!(candidate.notes, "null");
    }
}
