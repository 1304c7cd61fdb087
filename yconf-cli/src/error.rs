//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use std::fmt;
use yconf::Error as LibError;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// The queried path does not resolve.
    QueryNotFound(String),

    /// The resolved configuration could not be rendered.
    Output(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Query path not found
    /// - 2: Configuration, parse or output error
    ///
    /// Usage errors reported by clap exit with clap's own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::QueryNotFound(_) => 1,
            CliError::Library(LibError::Cli(e)) => e.exit_code(),
            CliError::Library(_) | CliError::Output(_) => 2,
        }
    }

    /// The clap error behind this error, if it is one.
    pub fn as_clap(&self) -> Option<&clap::Error> {
        match self {
            CliError::Library(LibError::Cli(e)) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::QueryNotFound(key) => write!(f, "Key not found: {key}"),
            CliError::Output(msg) => write!(f, "Output error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
