//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Begin/End protocol violation during interval reconstruction
    #[error("Malformed trace at event {position}: {message}")]
    MalformedTrace { position: usize, message: String },

    /// Correlation feed record missing a required field
    #[error("Malformed record at index {record}: {message}")]
    MalformedRecord { record: usize, message: String },

    /// Correlation feed record pointing at a function index that does not exist
    #[error("Unresolved function reference at record {record}: index {index} out of range (have {available})")]
    UnresolvedReference {
        record: usize,
        index: usize,
        available: usize,
    },

    /// Correlation feed unreadable or absent
    #[error("Feed error in {file:?}: {message}")]
    Feed { file: PathBuf, message: String },

    /// Trace source errors
    #[error("Trace source error: {0}")]
    TraceSource(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing configuration
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Ingestion cancelled via a cancel token
    #[error("Ingestion cancelled")]
    Cancelled,

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a trace source error
    pub fn trace_source(msg: impl Into<String>) -> Self {
        Self::TraceSource(msg.into())
    }

    /// Create a malformed-trace error for the event at `position`
    pub fn malformed_trace(position: usize, msg: impl Into<String>) -> Self {
        Self::MalformedTrace {
            position,
            message: msg.into(),
        }
    }

    /// Create a malformed-record error for the feed record at `record`
    pub fn malformed_record(record: usize, msg: impl Into<String>) -> Self {
        Self::MalformedRecord {
            record,
            message: msg.into(),
        }
    }

    /// Check if error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

// Implement From traits for common external error types

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::TraceSource(format!("JSON error: {}", err))
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::custom("test error");
        assert_eq!(err.to_string(), "test error");

        let err = Error::malformed_trace(3, "End event on empty lane 7");
        assert_eq!(
            err.to_string(),
            "Malformed trace at event 3: End event on empty lane 7"
        );
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = Error::UnresolvedReference {
            record: 2,
            index: 9,
            available: 4,
        };
        assert!(err.to_string().contains("record 2"));
        assert!(err.to_string().contains("index 9"));
    }

    #[test]
    fn test_cancelled() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::custom("other").is_cancelled());
    }
}
