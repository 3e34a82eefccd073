//! Rewrite requests and caller-side input validation.
//!
//! The pipeline itself never rejects input. These checks belong to the
//! calling layer and run before a model is ever contacted.

use serde::{Deserialize, Serialize};

/// Default maximum narrative length, in characters.
pub const DEFAULT_MAX_NARRATIVE_CHARS: usize = 10_000;

/// Maximum hours a single time entry may claim.
pub const MAX_ENTRY_HOURS: f64 = 24.0;

/// Maximum client identifier length.
pub const MAX_CLIENT_ID_LEN: usize = 50;

/// Client billing rules. Opaque to validation; only rendered into the prompt.
pub type ClientRules = serde_json::Map<String, serde_json::Value>;

/// Error type for rejected caller input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// Narrative is empty after sanitization.
    #[error("Original narrative cannot be empty.")]
    EmptyNarrative,

    /// Text exceeds the configured length limit.
    #[error("Text input too long. Maximum {max} characters allowed.")]
    TooLong {
        /// The limit that was exceeded.
        max: usize,
    },

    /// Hours below zero.
    #[error("Hours cannot be negative")]
    NegativeHours,

    /// Hours above the per-entry cap.
    #[error("Hours cannot exceed 24 in a single entry")]
    ExcessiveHours,

    /// Hours is NaN or infinite.
    #[error("Hours must be a finite number")]
    NonFiniteHours,

    /// Client identifier is empty.
    #[error("Client ID cannot be empty")]
    EmptyClientId,

    /// Client identifier contains disallowed characters.
    #[error("Client ID can only contain letters, numbers, hyphens, and underscores")]
    InvalidClientId,

    /// Client identifier is too long.
    #[error("Client ID must be 50 characters or less")]
    ClientIdTooLong,
}

/// Remove NUL bytes, enforce a length limit, and trim.
///
/// The limit is checked in characters, after NUL removal and before trimming.
pub fn sanitize_text_input(text: &str, max_chars: usize) -> Result<String, InputError> {
    let cleaned: String = text.chars().filter(|&c| c != '\0').collect();
    if cleaned.chars().count() > max_chars {
        return Err(InputError::TooLong { max: max_chars });
    }
    Ok(cleaned.trim().to_string())
}

/// Check an hours value and round it to two decimal places.
pub fn validate_hours(hours: f64) -> Result<f64, InputError> {
    if !hours.is_finite() {
        return Err(InputError::NonFiniteHours);
    }
    if hours < 0.0 {
        return Err(InputError::NegativeHours);
    }
    if hours > MAX_ENTRY_HOURS {
        return Err(InputError::ExcessiveHours);
    }
    Ok((hours * 100.0).round() / 100.0)
}

/// Trim a client identifier and check it against `[A-Za-z0-9_-]{1,50}`.
pub fn validate_client_id(client_id: &str) -> Result<String, InputError> {
    let trimmed = client_id.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyClientId);
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(InputError::InvalidClientId);
    }
    if trimmed.len() > MAX_CLIENT_ID_LEN {
        return Err(InputError::ClientIdTooLong);
    }
    Ok(trimmed.to_string())
}

/// A narrative submitted for rewriting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteRequest {
    /// Free-text narrative of the work performed.
    pub original: String,
    /// Hours billed. Passed through to the prompt unchanged.
    pub hours: f64,
    /// Optional client billing rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<ClientRules>,
    /// Optional client the entry is billed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl RewriteRequest {
    /// Create a request without rules or client.
    pub fn new(original: impl Into<String>, hours: f64) -> Self {
        Self {
            original: original.into(),
            hours,
            rules: None,
            client_id: None,
        }
    }

    /// Attach client rules.
    pub fn with_rules(mut self, rules: ClientRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Attach a client identifier.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sanitize and check every field, returning the cleaned request.
    pub fn validated(self, max_chars: usize) -> Result<Self, InputError> {
        let original = sanitize_text_input(&self.original, max_chars)?;
        if original.is_empty() {
            return Err(InputError::EmptyNarrative);
        }
        let hours = validate_hours(self.hours)?;
        let client_id = self
            .client_id
            .as_deref()
            .map(validate_client_id)
            .transpose()?;

        Ok(Self {
            original,
            hours,
            rules: self.rules,
            client_id,
        })
    }
}
