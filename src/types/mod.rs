//! Core types for the rewrite kernel.

pub mod rewrite;
pub mod rejection;
pub mod request;
pub mod provenance;

pub use rewrite::{RewriteResult, RewriteCandidate, FieldProblem, REQUIRED_FIELDS};
pub use rejection::{RejectionReason, Disposition};
pub use request::{
    RewriteRequest, ClientRules, InputError,
    sanitize_text_input, validate_hours, validate_client_id,
    DEFAULT_MAX_NARRATIVE_CHARS, MAX_ENTRY_HOURS, MAX_CLIENT_ID_LEN,
};
pub use provenance::{RewriteProvenance, AuditedRewrite, rules_snapshot};
