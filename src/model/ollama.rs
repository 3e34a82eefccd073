//! Ollama `/api/generate` backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ModelError, RewriteModel};
use crate::config::Settings;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Non-streaming Ollama client.
///
/// The whole request, including reading the body, is bounded by the
/// configured timeout.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    url: String,
    model_name: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a client for `url` and `model_name`.
    pub fn new(
        url: impl Into<String>,
        model_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rewrite-kernel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ModelError::Transport(format!("client init failed: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            model_name: model_name.into(),
            timeout,
        })
    }

    /// Create a client from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, ModelError> {
        Self::new(&settings.ollama_url, &settings.model_name, settings.model_timeout)
    }

    fn map_error(&self, e: reqwest::Error) -> ModelError {
        if e.is_timeout() {
            ModelError::Timeout(self.timeout)
        } else if let Some(status) = e.status() {
            ModelError::Status(status.as_u16())
        } else if e.is_decode() {
            ModelError::Decode(e.to_string())
        } else {
            ModelError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl RewriteModel for OllamaClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let body = GenerateRequest {
            model: &self.model_name,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.map_error(e))?;

        let envelope: GenerateResponse = response.json().await.map_err(|e| self.map_error(e))?;

        // A missing `response` field yields empty text, which the parse stage rejects.
        Ok(envelope.response.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            model: "qwen2.5:7b",
            prompt: "p",
            stream: false,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"model":"qwen2.5:7b","prompt":"p","stream":false}"#
        );
    }

    #[test]
    fn test_envelope_missing_response() {
        let envelope: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert_eq!(envelope.response.unwrap_or_default(), "");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let client = OllamaClient::new(
            "http://127.0.0.1:9/api/generate",
            "qwen2.5:7b",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            ModelError::Transport(_) | ModelError::Timeout(_)
        ));
    }
}
