//! Error types for taskplan modules using thiserror.

use std::time::Duration;

use thiserror::Error;

/// Errors from invoking the local model runtime.
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Model runtime '{0}' not found. Install Ollama from https://ollama.com or pass --ollama-bin")]
    NotInstalled(String),

    #[error("Failed to spawn model process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Failed to write prompt to model process: {0}")]
    StdinWriteFailed(#[source] std::io::Error),

    #[error("Failed while waiting for model process: {0}")]
    WaitFailed(#[source] std::io::Error),

    #[error("Model process timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("Model invocation was cancelled")]
    Cancelled,
}

/// Reasons an extraction did not produce a usable value.
///
/// These never propagate as `Err`; they travel inside
/// [`ExtractionResult::Failed`](crate::extract::ExtractionResult) together
/// with the raw model output.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No JSON found")]
    NoJson,

    #[error("JSON parse error: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Schema validation error: {0}")]
    Schema(String),
}
