//! Model runtime spawning.

use std::io;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::error::OllamaError;

/// Check that the model runtime is installed and runs.
///
/// Uses the `which` crate for cross-platform executable detection, then
/// verifies `<executable> --version` exits successfully.
pub async fn check_ollama_installed(executable: &str) -> Result<(), OllamaError> {
    if which::which(executable).is_err() {
        return Err(OllamaError::NotInstalled(executable.to_string()));
    }

    let version_check = Command::new(executable)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(OllamaError::SpawnFailed)?;

    if !version_check.status.success() {
        return Err(OllamaError::NotInstalled(executable.to_string()));
    }

    Ok(())
}

/// Run `<executable> run <model>` with the prompt on stdin and return stdout.
///
/// The exit status is not treated as a failure: a process that exits
/// non-zero still yields whatever it printed (possibly nothing). The status
/// and stderr are logged at warn level.
///
/// # Timeout
///
/// The whole exchange is bounded by `config.timeout`. On expiry the child is
/// killed and `OllamaError::Timeout` is returned. Dropping the returned
/// future before completion also kills the child.
pub async fn run_ollama(config: &ModelConfig, prompt: &str) -> Result<String, OllamaError> {
    debug!(
        executable = %config.executable,
        model = %config.model,
        "Starting model process (prompt length: {} chars)",
        prompt.len()
    );

    let mut child = Command::new(&config.executable)
        .arg("run")
        .arg(&config.model)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(OllamaError::SpawnFailed)?;

    let mut stdin = child.stdin.take().ok_or_else(|| {
        OllamaError::StdinWriteFailed(io::Error::other("child stdin was not captured"))
    })?;

    // Write and collect concurrently so neither side blocks on a full pipe.
    let write_prompt = async move {
        let result = stdin.write_all(prompt.as_bytes()).await;
        drop(stdin);
        result
    };

    let (write_result, output) = timeout(config.timeout, async {
        tokio::join!(write_prompt, child.wait_with_output())
    })
    .await
    .map_err(|_| OllamaError::Timeout(config.timeout))?;

    match write_result {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("Model process closed stdin before reading the whole prompt");
        }
        Err(e) => return Err(OllamaError::StdinWriteFailed(e)),
    }

    let output = output.map_err(OllamaError::WaitFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            code = ?output.status.code(),
            "Model process exited unsuccessfully: {}",
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
