//! Model runtime configuration.
//!
//! Values resolve in order: command-line flag, environment variable, default.
//! Invalid environment values are logged and replaced by the default.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Default model runtime executable.
pub const DEFAULT_EXECUTABLE: &str = "ollama";

/// Default model identifier passed to `<executable> run`.
pub const DEFAULT_MODEL: &str = "llama3.1:latest";

/// Default timeout for the model subprocess (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable overriding the model identifier.
pub const MODEL_ENV_VAR: &str = "TASKPLAN_MODEL";

/// Environment variable overriding the runtime executable.
pub const EXECUTABLE_ENV_VAR: &str = "TASKPLAN_OLLAMA_BIN";

/// Environment variable overriding the timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "TASKPLAN_TIMEOUT";

/// Everything the invocation layer needs to start the model process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub executable: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ModelConfig {
    /// Build a configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            executable: string_from_env(EXECUTABLE_ENV_VAR, DEFAULT_EXECUTABLE),
            model: string_from_env(MODEL_ENV_VAR, DEFAULT_MODEL),
            timeout: timeout_from_env(),
        }
    }

    /// Apply command-line overrides on top of this configuration.
    pub fn with_overrides(
        mut self,
        executable: Option<String>,
        model: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(executable) = executable {
            self.executable = executable;
        }
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }
}

fn string_from_env(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Read the timeout from `TASKPLAN_TIMEOUT`.
///
/// Zero is rejected along with non-numeric values: a zero timeout would fail
/// every invocation immediately.
fn timeout_from_env() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn without_config_env<F: FnOnce()>(f: F) {
        temp_env::with_vars_unset([MODEL_ENV_VAR, EXECUTABLE_ENV_VAR, TIMEOUT_ENV_VAR], f);
    }

    #[test]
    fn test_defaults_when_env_unset() {
        without_config_env(|| {
            let config = ModelConfig::from_env();
            assert_eq!(config, ModelConfig::default());
            assert_eq!(config.executable, "ollama");
            assert_eq!(config.model, "llama3.1:latest");
            assert_eq!(config.timeout, Duration::from_secs(300));
        });
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                (MODEL_ENV_VAR, Some("mistral:7b")),
                (EXECUTABLE_ENV_VAR, Some("/opt/ollama/bin/ollama")),
                (TIMEOUT_ENV_VAR, Some("60")),
            ],
            || {
                let config = ModelConfig::from_env();
                assert_eq!(config.model, "mistral:7b");
                assert_eq!(config.executable, "/opt/ollama/bin/ollama");
                assert_eq!(config.timeout, Duration::from_secs(60));
            },
        );
    }

    #[test]
    fn test_blank_model_env_uses_default() {
        temp_env::with_var(MODEL_ENV_VAR, Some("   "), || {
            assert_eq!(ModelConfig::from_env().model, DEFAULT_MODEL);
        });
    }

    #[test]
    fn test_get_timeout_invalid_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("not_a_number"), || {
            assert_eq!(timeout_from_env(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_get_timeout_zero_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("0"), || {
            assert_eq!(timeout_from_env(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_get_timeout_empty_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some(""), || {
            assert_eq!(timeout_from_env(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_cli_overrides_win_over_env() {
        temp_env::with_vars(
            [(MODEL_ENV_VAR, Some("from-env")), (TIMEOUT_ENV_VAR, Some("60"))],
            || {
                let config = ModelConfig::from_env().with_overrides(
                    None,
                    Some("from-flag".to_string()),
                    Some(5),
                );
                assert_eq!(config.model, "from-flag");
                assert_eq!(config.timeout, Duration::from_secs(5));
                assert_eq!(config.executable, DEFAULT_EXECUTABLE);
            },
        );
    }
}
