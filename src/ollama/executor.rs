//! Executor seam between orchestration and the model subprocess.

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::error::OllamaError;

use super::subprocess::run_ollama;

/// Trait for sending a prompt to a model and getting its raw reply.
///
/// This abstraction allows mocking the model subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelExecutor: Send + Sync {
    /// Run the model with the given prompt and return its raw stdout.
    async fn run(&self, prompt: &str) -> Result<String, OllamaError>;
}

/// Executor that calls the local model runtime CLI.
#[derive(Debug, Clone)]
pub struct OllamaExecutor {
    config: ModelConfig,
}

impl OllamaExecutor {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

#[async_trait]
impl ModelExecutor for OllamaExecutor {
    async fn run(&self, prompt: &str) -> Result<String, OllamaError> {
        run_ollama(&self.config, prompt).await
    }
}
