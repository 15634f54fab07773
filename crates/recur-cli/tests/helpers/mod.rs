use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness running the `recur` binary against an isolated config.
///
/// Every command runs inside a temporary directory with `RECUR_CONFIG`
/// pointing at a file there, and with no store credentials unless the
/// test provides them.
pub struct CliTestHarness {
    temp_dir: TempDir,
    config_path: PathBuf,
    store: Option<(String, String)>,
}

#[allow(dead_code)]
impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("recur.toml");

        Self {
            temp_dir,
            config_path,
            store: None,
        }
    }

    /// Points the binary at a mock Google Tasks API with a fixed token.
    pub fn with_store(mut self, base_url: &str, token: &str) -> Self {
        self.store = Some((base_url.to_string(), token.to_string()));
        self
    }

    pub fn write_config(&self, contents: &str) {
        std::fs::write(&self.config_path, contents).expect("Failed to write config file");
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("recur").expect("Failed to find recur binary");
        cmd.current_dir(self.temp_dir.path())
            .env("RECUR_CONFIG", &self.config_path)
            .env_remove("RUST_LOG")
            .env_remove("RECUR_STORE__ACCESS_TOKEN")
            .env_remove("RECUR_STORE__TOKEN_FILE")
            .env_remove("RECUR_STORE__BASE_URL");
        if let Some((base_url, token)) = &self.store {
            cmd.env("RECUR_STORE__BASE_URL", base_url)
                .env("RECUR_STORE__ACCESS_TOKEN", token);
        }
        cmd
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// Utility functions for test assertions
#[allow(dead_code)]
pub mod assertions {
    use predicates::prelude::*;

    pub fn has_task_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Every"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }

    pub fn not_authenticated() -> impl Predicate<str> {
        predicate::str::contains("Not authenticated")
    }
}
