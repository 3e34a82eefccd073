//! # rewrite-kernel
//!
//! Acceptance and drift checking for model-rewritten time entry narratives.
//!
//! The Rewrite Kernel answers one question:
//!
//! > Given a narrative and a model's rewrite of it, can the rewrite be trusted?
//!
//! ## Core Contract
//!
//! 1. Given an original narrative and raw model output, extract and
//!    schema-check the proposed rewrite
//! 2. Compare the `standard` variant to the original by token overlap, with
//!    a hard override for must-preserve terms
//! 3. Return the trimmed rewrite, or a deterministic minimally-cleaned
//!    fallback. Never an error.
//!
//! ## Architecture
//!
//! ```text
//! RewriteRequest → Prompt → RewriteModel → raw text
//!                                            ↓
//!                  extract_json → RewriteCandidate → DriftReport → RewriteResult
//!                        ↓               ↓               ↓
//!                        └───────────────┴───────────────┴──→ simple_fallback_rewrite
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same original + same raw output + same policy → identical result
//! - Token sets are ordered, so logged drift details are stable
//! - Policy parameter hashes are independent of float formatting

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod tokenize;
pub mod policy;
pub mod extract;
pub mod fallback;
pub mod validator;
pub mod prompt;
pub mod model;
pub mod engine;
pub mod config;
pub mod canonical;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::{
    RewriteResult, RewriteCandidate, FieldProblem,
    RejectionReason, Disposition,
    RewriteRequest, ClientRules, InputError,
    RewriteProvenance, AuditedRewrite,
};
pub use tokenize::{tokenize, TokenSet, STOPWORDS};
pub use policy::{
    DriftPolicy, DriftReport, too_much_drift, too_much_drift_with,
    DRIFT_MIN_OVERLAP, MUST_PRESERVE_TOKENS,
};
pub use extract::{extract_json, JsonObject, MalformedOutput};
pub use fallback::{simple_fallback_rewrite, FALLBACK_DEFAULT_TEXT, FALLBACK_NOTE};
pub use validator::{validate_rewrite, RewriteValidator, ValidationOutcome};
pub use prompt::{build_prompt, build_user_prompt, SYSTEM_PROMPT};
pub use model::{RewriteModel, ModelError, ScriptedModel};
#[cfg(feature = "ollama")]
pub use model::OllamaClient;
pub use engine::RewriteEngine;
pub use config::Settings;
pub use canonical::{canonical_hash_hex, compute_content_hash};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceState};

/// Schema version for rewrite kernel result and provenance types.
/// Increment on breaking changes to any schema type.
pub const REWRITE_KERNEL_SCHEMA_VERSION: &str = "1.0.0";

/// Default drift policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "drift_policy_v1";
