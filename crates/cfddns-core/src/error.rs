//! Error types for cfddns
//!
//! Per-line problems are never errors: they become annotations on the
//! rewritten line. The variants here cover the conditions that abort a run
//! (unreadable or unwritable configuration file, invalid settings) and the
//! failures a transport reports before the client degrades them to empty
//! results.

use thiserror::Error;

/// Result type alias for cfddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cfddns
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be read or replaced
    #[error("Configuration file error: {0}")]
    ConfigFile(String),

    /// Invalid engine or transport settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP-level errors (bad URL, unreadable body)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Transport failures (connect, TLS, timeout)
    #[error("Transport error ({transport}): {message}")]
    Transport {
        /// Transport name
        transport: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration file error
    pub fn config_file(msg: impl Into<String>) -> Self {
        Self::ConfigFile(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a transport error
    pub fn transport(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            transport: transport.into(),
            message: message.into(),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
