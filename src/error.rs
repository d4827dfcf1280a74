//! Error types for warscribe
//!
//! Catalogue parsing is deliberately tolerant: missing fields, unresolvable
//! links and truncated documents degrade to partial results instead of
//! erroring. The variants here cover the failures that are surfaced:
//! transport, I/O and resource limits.

use thiserror::Error;

/// Result type alias using warscribe Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for warscribe operations
#[derive(Error, Debug)]
pub enum Error {
    /// XML syntax error that left no usable document at all
    #[error("XML error: {0}")]
    Xml(String),

    /// Catalogue fetch failure (non-2xx status or transport error)
    #[error("failed to load catalogue '{path}': {reason}")]
    Fetch {
        /// Catalogue path or URL that was requested
        path: String,
        /// Status line or transport error text
        reason: String,
    },

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Record serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
