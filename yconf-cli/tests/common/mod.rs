//! Common test utilities for CLI integration tests.
//!
//! This module provides an isolated directory for configuration sources and
//! a command builder for the `yconf` binary.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Tiers shared by most CLI tests.
pub const TIERED_CONFIG: &str = "\
production:
  server:
    host: prod.internal
    port: 80
  log-level: warn
staging:
  server:
    host: staging.internal
development:
  server:
    port: 8080
  log-level: debug
";

/// Test environment with an isolated temporary directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a command builder for the yconf binary.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("yconf").expect("Failed to find yconf binary");
        cmd.current_dir(&self.temp_path);
        cmd
    }

    /// Write a file under the test directory and return its path.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create test directory");
        }
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Write the standard tiers to `config.yml`.
    pub fn tiered_config(&self) -> PathBuf {
        self.write_file("config.yml", TIERED_CONFIG)
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }
}
