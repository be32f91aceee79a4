//! Error types for docchat-core
//!
//! Two layers of failure live here:
//! - [`Error`] covers the client itself (config, IO, logging setup).
//! - [`Failure`] is the outcome of one backend operation and is always
//!   recoverable: it ends up as text in a status region, never as a crash.

use thiserror::Error;

/// Main error type for the docchat-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Result type alias for docchat-core
pub type Result<T> = std::result::Result<T, Error>;

/// Why a backend operation did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The backend answered with `status: "error"`.
    ///
    /// `None` when the reply carried no `message`.
    #[error("rejected by backend: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),

    /// No response at all (connection refused, reset, timed out).
    #[error("transport failure: {0}")]
    Transport(String),

    /// A response arrived but could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The selected local file could not be read.
    #[error("{0}")]
    Unreadable(String),
}

impl Failure {
    /// Text to show in a status region, given the region's generic fallback.
    ///
    /// Backend messages are surfaced verbatim; anything without a usable
    /// message falls back to `generic`.
    pub fn status_text(&self, generic: &str) -> String {
        match self {
            Failure::Rejected(Some(message)) if !message.trim().is_empty() => message.clone(),
            Failure::Unreadable(message) => message.clone(),
            _ => generic.to_string(),
        }
    }
}

/// Outcome of one backend operation.
pub type Outcome<T> = std::result::Result<T, Failure>;
