//! Runtime settings.
//!
//! ## Environment Variables
//!
//! - `OLLAMA_URL`: generate endpoint (default: `http://localhost:11434/api/generate`)
//! - `MODEL_NAME`: model to request (default: `qwen2.5:7b`)
//! - `MODEL_TIMEOUT_SECS`: per-request timeout (default: 90)
//! - `MAX_NARRATIVE_CHARS`: input length limit (default: 10000)
//!
//! Unparseable values fall back to the default with a warning.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::DEFAULT_MAX_NARRATIVE_CHARS;

/// Default Ollama generate endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";

/// Default model name.
pub const DEFAULT_MODEL_NAME: &str = "qwen2.5:7b";

/// Default model request timeout.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(90);

/// Rewrite kernel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Model generate endpoint.
    pub ollama_url: String,
    /// Model name sent with each request.
    pub model_name: String,
    /// Timeout for one model request.
    pub model_timeout: Duration,
    /// Maximum narrative length in characters.
    pub max_narrative_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            max_narrative_chars: DEFAULT_MAX_NARRATIVE_CHARS,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            ollama_url: non_empty("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            model_name: non_empty("MODEL_NAME").unwrap_or(defaults.model_name),
            model_timeout: parse_or("MODEL_TIMEOUT_SECS", non_empty("MODEL_TIMEOUT_SECS"))
                .filter(|&secs: &u64| secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.model_timeout),
            max_narrative_chars: parse_or("MAX_NARRATIVE_CHARS", non_empty("MAX_NARRATIVE_CHARS"))
                .unwrap_or(defaults.max_narrative_chars),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key = key, value = %value, "ignoring unparseable setting, using default");
            None
        }
    }
}
