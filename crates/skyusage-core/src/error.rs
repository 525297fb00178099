//! Error types for skyusage
//!
//! One error enum is shared by every skyusage crate. Transport and decoding
//! failures convert in with `?`.
//!
//! # Example
//!
//! ```
//! use skyusage_core::error::{Result, SkyusageError};
//! use skyusage_core::types::DailyDate;
//!
//! fn parse_since(arg: &str) -> Result<DailyDate> {
//!     arg.parse()
//! }
//!
//! assert!(matches!(parse_since("2025-13-01"), Err(SkyusageError::InvalidDate(_))));
//! ```

use thiserror::Error;

/// Main error type for skyusage operations
///
/// Transport and authentication failures are fatal for the call that hit
/// them. Malformed usage data never produces an error; it reconciles to zero.
#[derive(Error, Debug)]
pub enum SkyusageError {
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network error (DNS, connect, timeout, body decoding)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("API error: {endpoint} returned {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Endpoint path that was requested
        endpoint: String,
        /// Response body, as far as it could be read
        body: String,
    },

    /// Token could not be obtained
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Archive backend error
    #[error("Archive error: {0}")]
    Archive(String),
}

impl SkyusageError {
    /// HTTP status carried by the error, if the provider produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            SkyusageError::Api { status, .. } => Some(*status),
            SkyusageError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Convenience type alias for Results in skyusage
///
/// # Example
///
/// ```
/// use skyusage_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SkyusageError>;
