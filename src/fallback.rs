//! Deterministic fallback rewrite.
//!
//! Used whenever model output cannot be trusted. The original wording is
//! kept; only surrounding whitespace, the first letter's case, and the
//! final period change. This function has no failure modes.

use crate::types::RewriteResult;

/// Text used when the original narrative is blank.
pub const FALLBACK_DEFAULT_TEXT: &str = "Performed legal services.";

/// Note attached to every fallback result.
pub const FALLBACK_NOTE: &str = "LLM rewrite was rejected due to potential semantic change or invalid output. \
Using a minimal cleaned version that preserves the original wording.";

/// Trim, capitalize the first character, and end with a period.
pub fn minimal_clean(original: &str) -> String {
    let trimmed = original.trim();
    if trimmed.is_empty() {
        return FALLBACK_DEFAULT_TEXT.to_string();
    }

    let mut chars = trimmed.chars();
    let mut text = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    if !text.ends_with('.') {
        text.push('.');
    }
    text
}

/// Build the fallback result for `original`.
pub fn simple_fallback_rewrite(original: &str) -> RewriteResult {
    let text = minimal_clean(original);
    RewriteResult {
        standard: text.clone(),
        client_compliant: text.clone(),
        audit_safe: text,
        notes: FALLBACK_NOTE.to_string(),
    }
}
