//! Service state management.

use std::sync::Arc;

use crate::config::Settings;
use crate::engine::RewriteEngine;
use crate::model::{ModelError, OllamaClient, RewriteModel};

/// Shared service state.
///
/// Contains the rewrite engine and the settings it was built from.
pub struct ServiceState<M: RewriteModel + 'static> {
    /// Engine used for every rewrite request.
    pub engine: RewriteEngine<M>,
    /// Runtime settings.
    pub settings: Arc<Settings>,
}

impl<M: RewriteModel + 'static> ServiceState<M> {
    /// Create service state from a model backend and settings.
    pub fn new(model: M, settings: Settings) -> Self {
        Self {
            engine: RewriteEngine::from_settings(model, &settings),
            settings: Arc::new(settings),
        }
    }

    /// Create service state with a pre-built engine.
    pub fn with_engine(engine: RewriteEngine<M>, settings: Settings) -> Self {
        Self {
            engine,
            settings: Arc::new(settings),
        }
    }
}

impl ServiceState<OllamaClient> {
    /// Create service state backed by Ollama, configured from environment variables.
    pub fn from_env() -> Result<Self, ModelError> {
        let settings = Settings::from_env();
        let client = OllamaClient::from_settings(&settings)?;
        Ok(Self::new(client, settings))
    }
}

impl<M: RewriteModel + 'static> Clone for ServiceState<M> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScriptedModel;
    use std::time::Duration;

    #[test]
    fn test_state_shares_settings() {
        let settings = Settings {
            model_timeout: Duration::from_secs(5),
            ..Settings::default()
        };
        let state = ServiceState::new(ScriptedModel::new("scripted"), settings);
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.settings, &cloned.settings));
        assert_eq!(cloned.settings.model_timeout, Duration::from_secs(5));
    }
}
