//! Rewrite model backends.
//!
//! The validation core never performs I/O. A [`RewriteModel`] is the
//! boundary that turns a prompt into raw text; whatever it returns (or
//! fails to return) is handed to the validator.

pub mod scripted;

#[cfg(feature = "ollama")]
pub mod ollama;

use std::time::Duration;

use async_trait::async_trait;

/// Error type for model backends.
///
/// Every variant is treated the same way by the engine: the fallback
/// rewrite is returned and the error is recorded as a transport rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The request could not be sent or the connection failed.
    #[error("model request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status.
    #[error("model backend returned status {0}")]
    Status(u16),

    /// The backend did not answer in time.
    #[error("model request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend's envelope could not be decoded.
    #[error("model response could not be decoded: {0}")]
    Decode(String),

    /// No backend is available to answer.
    #[error("model unavailable: {0}")]
    Unavailable(String),
}

/// Trait for rewrite model backends.
#[async_trait]
pub trait RewriteModel: Send + Sync {
    /// Name recorded in provenance.
    fn model_name(&self) -> &str;

    /// Generate raw text for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

pub use scripted::ScriptedModel;

#[cfg(feature = "ollama")]
pub use ollama::OllamaClient;
