//! Error handling for the foxtype code generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! Unresolved `$ref` targets are deliberately absent from this enum: they
//! degrade to the `unknown` type and are only logged.
//!
//! # Examples
//!
//! ```
//! use foxtype_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::transport("share not found"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for foxtype generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for foxtype generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error while talking to the document source
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document source was unreachable or returned malformed data
    #[error("Transport error: {0}")]
    Transport(String),

    /// An endpoint has no success response to derive its `Response` type from
    #[error("endpoint '{endpoint}' has no response named '{expected}'")]
    MissingSuccessResponse {
        /// Method and path of the offending endpoint
        endpoint: String,
        /// Response name that was looked up
        expected: String,
    },

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Whether this error only concerns a single endpoint and the run may go on
    pub fn is_endpoint_local(&self) -> bool {
        matches!(self, Self::MissingSuccessResponse { .. })
    }
}
