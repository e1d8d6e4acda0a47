//! Configuration error types.

use thiserror::Error;

/// Error raised while reading or validating the input configuration.
///
/// Configuration errors are fatal at construction: a source term is never
/// built from an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input file
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A mandatory key is absent
    #[error("Missing mandatory input '{key}'")]
    Missing { key: String },

    /// A key is present but its value is not acceptable
    #[error("Invalid value for '{key}': {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Source term name not known to the registry
    #[error("Unknown source term '{0}'")]
    UnknownSourceTerm(String),
}

impl ConfigError {
    /// Create a missing-key error.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    /// Create an invalid-value error.
    pub fn invalid(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
