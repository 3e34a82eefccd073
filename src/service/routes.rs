//! Axum routes for the Rewrite Kernel service.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::model::{OllamaClient, RewriteModel};
use crate::policy::DriftPolicy;
use crate::types::{AuditedRewrite, ClientRules, RewriteRequest};
use crate::validator::ValidationOutcome;
use crate::REWRITE_KERNEL_SCHEMA_VERSION;

use super::middleware::record_rewrite_metrics;
use super::state::ServiceState;

/// Type alias for the service state backed by Ollama.
pub type AppState = ServiceState<OllamaClient>;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to validate model output that was obtained elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// Original narrative.
    pub original: String,
    /// Hours billed (not used for acceptance).
    #[serde(default)]
    pub hours: f64,
    /// Rules the model was prompted with (not used for acceptance).
    #[serde(default)]
    pub rules: Option<ClientRules>,
    /// Untrusted model output.
    pub raw_model_output: String,
}

/// Active drift policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResponse {
    /// The policy parameters.
    pub policy: DriftPolicy,
    /// Hash of the policy parameters.
    pub params_hash: String,
    /// Result schema version.
    pub schema_version: String,
}

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub schema_version: String,
    pub model_name: String,
    pub policy_params_hash: String,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Structured error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(code = %self.code, error = %self.error, "Request error");
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Rewrite a narrative through the model and validation pipeline.
///
/// Only malformed input is an error; model failures degrade to the fallback.
async fn rewrite_handler<M: RewriteModel + 'static>(
    State(state): State<Arc<ServiceState<M>>>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<AuditedRewrite>, ErrorResponse> {
    let request = request
        .validated(state.settings.max_narrative_chars)
        .map_err(|e| ErrorResponse::new("INVALID_INPUT", e.to_string()))?;

    let start = Instant::now();
    let audited = state.engine.rewrite_with_provenance(&request).await;
    record_rewrite_metrics(
        "rewrite",
        audited.provenance.disposition.label(),
        start.elapsed().as_millis() as u64,
    );

    Ok(Json(audited))
}

/// Validate externally obtained model output.
async fn validate_handler<M: RewriteModel + 'static>(
    State(state): State<Arc<ServiceState<M>>>,
    Json(request): Json<ValidateRequest>,
) -> Json<ValidationOutcome> {
    let start = Instant::now();
    let outcome = state
        .engine
        .validator()
        .evaluate(&request.original, &request.raw_model_output);
    record_rewrite_metrics(
        "validate",
        outcome.disposition.label(),
        start.elapsed().as_millis() as u64,
    );
    Json(outcome)
}

/// Show the active drift policy.
async fn policy_handler<M: RewriteModel + 'static>(
    State(state): State<Arc<ServiceState<M>>>,
) -> Json<PolicyResponse> {
    let policy = state.engine.validator().policy().clone();
    Json(PolicyResponse {
        params_hash: policy.params_hash(),
        policy,
        schema_version: REWRITE_KERNEL_SCHEMA_VERSION.to_string(),
    })
}

/// Health check endpoint (detailed).
async fn health_handler<M: RewriteModel + 'static>(
    State(state): State<Arc<ServiceState<M>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: REWRITE_KERNEL_SCHEMA_VERSION.to_string(),
        model_name: state.engine.model().model_name().to_string(),
        policy_params_hash: state.engine.validator().policy().params_hash(),
    })
}

/// Liveness probe endpoint.
///
/// The model backend is not checked: an unreachable model degrades
/// rewrites to the fallback instead of failing them.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the Rewrite Kernel service.
pub fn create_router<M: RewriteModel + 'static>(state: ServiceState<M>) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Rewrite operations
        .route("/api/rewrite", post(rewrite_handler::<M>))
        .route("/api/validate", post(validate_handler::<M>))
        // Policy
        .route("/api/policy", get(policy_handler::<M>))
        // Health checks
        .route("/health", get(health_handler::<M>))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(liveness_handler))
        .with_state(state)
}
