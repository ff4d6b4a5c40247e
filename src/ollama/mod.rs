//! Ollama CLI integration.

pub mod executor;
pub mod subprocess;

pub use executor::{ModelExecutor, OllamaExecutor};
pub use subprocess::{check_ollama_installed, run_ollama};
