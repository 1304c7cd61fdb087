//! Utility functions for CLI operations.
//!
//! This module provides helpers shared by the CLI: early option scanning,
//! `--set` assignment handling and output rendering.

use crate::error::CliError;
use serde::Deserialize;
use serde_yaml::Value as Yaml;
use std::ffi::OsString;
use std::fmt;
use yconf::{PathTree, Value};

/// Global CLI options needed before the configuration is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

impl GlobalOptions {
    /// Scans raw arguments for `--verbose` and `--quiet`.
    ///
    /// Logging has to be configured before configuration files are loaded,
    /// so these flags are read ahead of the real parse. Arguments after `--`
    /// are ignored.
    pub fn scan(args: &[OsString]) -> Self {
        let mut options = Self::default();
        for arg in args {
            match arg.to_str() {
                Some("--") => break,
                Some("--verbose") => options.verbose = true,
                Some("--quiet") => options.quiet = true,
                _ => {}
            }
        }
        options
    }
}

/// Output format for the resolved configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML document.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Names accepted by `--format`.
    pub const NAMES: [&'static str; 2] = ["yaml", "json"];
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Validates a `KEY=VALUE` assignment for `--set`.
pub fn parse_assignment(s: &str) -> Result<String, String> {
    match s.split_once('=') {
        Some((key, _)) if !key.is_empty() => Ok(s.to_string()),
        Some(_) => Err("assignment key must not be empty".to_string()),
        None => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// Applies a validated `KEY=VALUE` assignment to `tree`.
///
/// The value is read as YAML, so `--set port=8080` stores an integer and
/// `--set name=web` a string. Text that is not valid YAML is stored as a
/// plain string.
pub fn apply_assignment(tree: &PathTree, assignment: &str) -> Result<(), CliError> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| CliError::Output(format!("malformed assignment '{assignment}'")))?;
    let parsed = serde_yaml::from_str::<Yaml>(raw).unwrap_or_else(|_| Yaml::from(raw));
    log::debug!("Setting '{key}' from the command line");
    tree.set(key, Value::try_from(parsed)?);
    Ok(())
}

/// Renders a resolved value.
pub fn render(value: &Value, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|e| CliError::Output(e.to_string())),
        OutputFormat::Json => {
            let mut output = serde_json::to_string_pretty(value)?;
            output.push('\n');
            Ok(output)
        }
    }
}
