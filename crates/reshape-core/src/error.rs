//! Error types for the Reshape core library
//!
//! This module defines the error handling system for Reshape, using thiserror
//! for ergonomic error definitions and anyhow for flexible error sources.
//!
//! Lookup misses are not errors: a path that resolves to nothing is reported as
//! `None` and handled through defaults or omission. Only caller-supplied
//! callbacks and malformed mapping documents produce an [`Error`].

use std::fmt;
use thiserror::Error;

/// Main error type for Reshape operations
#[derive(Error, Debug)]
pub enum Error {
    /// Failure raised by a caller-supplied transform or each callback
    #[error("Callback failed: {message}")]
    Callback {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Malformed mapping document
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        /// Top-level document key that failed to load, when one can be named
        field: Option<String>,
    },

    /// A mapping document names a callback the registry does not know
    #[error("Unknown {kind} callback: '{name}'")]
    UnknownCallback {
        name: String,
        kind: CallbackKind,
    },

    /// JSON parsing errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Which registry table a callback name was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    /// Value transform used by the operate stage
    Transform,
    /// Per-record callback used by the each stage
    Each,
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackKind::Transform => write!(f, "transform"),
            CallbackKind::Each => write!(f, "each"),
        }
    }
}

impl Error {
    /// Build a callback failure from a message
    pub fn callback(message: impl Into<String>) -> Self {
        Error::Callback {
            message: message.into(),
            source: None,
        }
    }

    /// Build a callback failure that wraps an underlying error
    pub fn callback_with(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Error::Callback {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>, field: Option<&str>) -> Self {
        Error::Configuration {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
