//! Rewrite engine: prompt, model call, validation.
//!
//! ```text
//! RewriteRequest → build_prompt → RewriteModel::generate ─┬─ Ok(raw) → RewriteValidator
//!                                                         └─ Err / timeout → Fallback (Transport)
//! ```
//!
//! The engine is the only place that waits. Every model call is bounded by
//! the engine timeout; backends such as
//! [`OllamaClient`](crate::model::OllamaClient) also bound their own
//! requests. Either way a timeout is just another transport failure.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::{Settings, DEFAULT_MODEL_TIMEOUT};
use crate::model::{ModelError, RewriteModel};
use crate::prompt::build_prompt;
use crate::types::{AuditedRewrite, RewriteProvenance, RewriteRequest, RewriteResult};
use crate::validator::{RewriteValidator, ValidationOutcome};

/// Drives one model backend through the validation pipeline.
pub struct RewriteEngine<M: RewriteModel> {
    model: Arc<M>,
    validator: RewriteValidator,
    timeout: Duration,
}

impl<M: RewriteModel> RewriteEngine<M> {
    /// Create an engine with the default policy and timeout.
    pub fn new(model: M) -> Self {
        Self::with_validator(model, RewriteValidator::default(), DEFAULT_MODEL_TIMEOUT)
    }

    /// Create an engine with an explicit validator and timeout.
    pub fn with_validator(model: M, validator: RewriteValidator, timeout: Duration) -> Self {
        Self {
            model: Arc::new(model),
            validator,
            timeout,
        }
    }

    /// Create an engine using the timeout from `settings`.
    pub fn from_settings(model: M, settings: &Settings) -> Self {
        Self::with_validator(model, RewriteValidator::default(), settings.model_timeout)
    }

    /// The model backend.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The validator in use.
    pub fn validator(&self) -> &RewriteValidator {
        &self.validator
    }

    /// The model call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        match tokio::time::timeout(self.timeout, self.model.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ModelError::Timeout(self.timeout)),
        }
    }

    /// Rewrite a narrative, returning the result and how it was reached.
    pub async fn evaluate(&self, request: &RewriteRequest) -> ValidationOutcome {
        let prompt = build_prompt(&request.original, request.hours, request.rules.as_ref());
        let start = Instant::now();

        let outcome = match self.generate(&prompt).await {
            Ok(raw) => self.validator.evaluate(&request.original, &raw),
            Err(e) => {
                warn!(
                    target: "rewrite_kernel::engine",
                    model = self.model.model_name(),
                    error = %e,
                    "model call failed"
                );
                self.validator.transport_failure(&request.original, e.to_string())
            }
        };

        info!(
            target: "rewrite_kernel::engine",
            model = self.model.model_name(),
            disposition = outcome.disposition.label(),
            latency_ms = start.elapsed().as_millis() as u64,
            "rewrite completed"
        );
        outcome
    }

    /// Rewrite a narrative. Never fails.
    pub async fn rewrite(&self, request: &RewriteRequest) -> RewriteResult {
        self.evaluate(request).await.result
    }

    /// Rewrite a narrative and attach audit provenance.
    pub async fn rewrite_with_provenance(&self, request: &RewriteRequest) -> AuditedRewrite {
        let outcome = self.evaluate(request).await;
        let provenance = RewriteProvenance::record(
            self.validator.policy(),
            self.model.model_name(),
            request.rules.as_ref(),
            &request.original,
            outcome.disposition,
        );
        AuditedRewrite {
            result: outcome.result,
            provenance,
        }
    }
}

impl<M: RewriteModel> Clone for RewriteEngine<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            validator: self.validator.clone(),
            timeout: self.timeout,
        }
    }
}
