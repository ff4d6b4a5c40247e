//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use taskplan::ModelConfig;

/// Create an executable mock runtime script and return the temp directory + script path.
///
/// The directory must be kept alive for as long as the script is used.
pub fn create_mock_script(script_content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let script_path = temp_dir.path().join("mock_ollama.sh");

    let mut file = File::create(&script_path).expect("Failed to create mock script");
    file.write_all(script_content.as_bytes())
        .expect("Failed to write mock script");
    file.sync_all().expect("Failed to sync mock script");
    drop(file);

    let mut perms = fs::metadata(&script_path)
        .expect("Failed to get metadata")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script_path, perms).expect("Failed to set permissions");

    (temp_dir, script_path)
}

/// Model configuration pointing at a mock script.
pub fn mock_config(script_path: &Path, timeout: Duration) -> ModelConfig {
    ModelConfig {
        executable: script_path.display().to_string(),
        model: "mock-model:latest".to_string(),
        timeout,
    }
}
