//! taskplan - A CLI tool that turns a goal into a structured to-do list.
//!
//! # Overview
//!
//! taskplan sends a goal to a locally running language model through the
//! Ollama CLI, asks for a JSON to-do list, and extracts the JSON object from
//! the model's free-text reply.

pub mod agent;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod ollama;
pub mod plan;
pub mod prompt;

// Re-export commonly used types
pub use agent::{ExtractOptions, create_todo_plan, create_todo_plan_until};
pub use config::ModelConfig;
pub use error::{ExtractError, OllamaError};
pub use extract::{ExtractMode, ExtractionResult, extract_json};
pub use plan::{TodoPlan, TodoTask};
