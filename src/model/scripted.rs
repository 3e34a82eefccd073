//! Scripted model backend for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ModelError, RewriteModel};

/// Model that replays queued responses in order.
///
/// Once the queue is drained it keeps returning the `always` response if
/// one was configured, otherwise [`ModelError::Unavailable`]. Every prompt
/// it receives is recorded.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    name: String,
    queue: Mutex<VecDeque<Result<String, ModelError>>>,
    always: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    /// Create an empty script.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Model that answers every prompt with `output`.
    pub fn always(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            always: Some(output.into()),
            ..Self::new(name)
        }
    }

    /// Queue a raw output.
    pub fn push_output(self, output: impl Into<String>) -> Self {
        self.push(Ok(output.into()))
    }

    /// Queue a failure.
    pub fn push_error(self, error: ModelError) -> Self {
        self.push(Err(error))
    }

    fn push(self, response: Result<String, ModelError>) -> Self {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl RewriteModel for ScriptedModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());

        let next = self.queue.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
        match (next, &self.always) {
            (Some(response), _) => response,
            (None, Some(output)) => Ok(output.clone()),
            (None, None) => Err(ModelError::Unavailable("script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_exhausts() {
        let model = ScriptedModel::new("scripted")
            .push_output("first")
            .push_error(ModelError::Status(500));

        assert_eq!(model.generate("p1").await, Ok("first".to_string()));
        assert_eq!(model.generate("p2").await, Err(ModelError::Status(500)));
        assert!(matches!(model.generate("p3").await, Err(ModelError::Unavailable(_))));
        assert_eq!(model.prompts(), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_always_after_queue() {
        let model = ScriptedModel::always("scripted", "steady").push_output("once");
        assert_eq!(model.generate("a").await.unwrap(), "once");
        assert_eq!(model.generate("b").await.unwrap(), "steady");
        assert_eq!(model.generate("c").await.unwrap(), "steady");
        assert_eq!(model.model_name(), "scripted");
    }
}
