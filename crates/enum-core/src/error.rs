//! Error types for the ENUM sync system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for ENUM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the ENUM sync system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Subscriber source errors (store unreachable, unreadable export, ...)
    #[error("Subscriber source error: {0}")]
    Source(String),

    /// The DNS management API answered with a non-success status
    #[error("PowerDNS API error: {status} - {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, kept verbatim for diagnostics
        body: String,
    },

    /// The request never produced a response (connect, TLS, timeout)
    #[error("PowerDNS request failed: {0}")]
    Request(String),

    /// A backend call failed while strict mode was enabled.
    ///
    /// The operation stopped at the failing endpoint/domain; later pairs
    /// were not attempted.
    #[error("ENUM {operation} failed: {detail}")]
    StrictMode {
        /// Operation that was aborted ("creation", "deletion")
        operation: &'static str,
        /// Formatted `<endpoint>/<domain>: <detail>` string
        detail: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a subscriber source error
    pub fn subscriber_source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create an API status error
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a request (transport-level) error
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// Create a strict-mode abort
    pub fn strict_mode(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::StrictMode {
            operation,
            detail: detail.into(),
        }
    }

    /// Whether this error is a strict-mode abort
    pub fn is_strict_mode(&self) -> bool {
        matches!(self, Self::StrictMode { .. })
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
