//! Error types for the yconf library.
//!
//! This module provides the error hierarchy for tree access, YAML loading,
//! environment resolution and argument binding, using `thiserror` for
//! ergonomic error handling.

use thiserror::Error;

/// Result type alias for operations that may fail with a yconf error.
///
/// # Examples
///
/// ```
/// use yconf::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(10)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the yconf library.
#[derive(Debug, Error)]
pub enum Error {
    /// A symbolic environment name is not part of the configured tier set.
    #[error("unknown environment: {name}")]
    UnknownEnvironment {
        /// The unrecognized environment name.
        name: String,
    },

    /// An environment value was neither an ordinal nor a name.
    #[error("environment value is not an integer or a valid string: {found}")]
    InvalidEnvironmentType {
        /// Rendering of the offending value.
        found: String,
    },

    /// A hyphenated key and its underscore spelling both exist in one mapping.
    #[error("key '{normalized}' causes a mapping conflict with key '{original}'")]
    KeyConflict {
        /// The underscore-normalized key that already existed.
        normalized: String,
        /// The hyphenated key that was being normalized.
        original: String,
    },

    /// A key required by item-style access or deletion is absent.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing key or dotted path.
        key: String,
    },

    /// A YAML mapping used a key that is not a string.
    #[error("mapping keys must be strings, found {key}")]
    InvalidKey {
        /// Rendering of the offending key.
        key: String,
    },

    /// A configuration document does not have the expected shape.
    #[error("invalid configuration document '{source_name}': {reason}")]
    InvalidDocument {
        /// The tier or file the document came from.
        source_name: String,
        /// Why the document was rejected.
        reason: String,
    },

    /// An environment tier set could not be constructed.
    #[error("invalid environment tiers: {reason}")]
    InvalidTiers {
        /// Why the tier set was rejected.
        reason: String,
    },

    /// YAML parsing or conversion failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Command-line parsing failed, or help/version output was requested.
    #[error("{0}")]
    Cli(#[from] clap::Error),
}

impl Error {
    /// Check if error indicates a missing key.
    ///
    /// # Examples
    ///
    /// ```
    /// use yconf::Error;
    ///
    /// let err = Error::KeyNotFound { key: "a.b".to_string() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }

    /// Check if error was caused by an environment selector.
    #[must_use]
    pub fn is_environment_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownEnvironment { .. } | Self::InvalidEnvironmentType { .. }
        )
    }
}
