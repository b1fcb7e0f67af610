//! Error types for sitescore.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`SiteScoreError`] enum.
//!
//! # Examples
//!
//! ```
//! use sitescore::error::{Result, SiteScoreError};
//!
//! fn check_keyword(keyword: &str) -> Result<()> {
//!     if keyword.is_empty() {
//!         return Err(SiteScoreError::invalid_input("keyword must not be empty"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_keyword("").is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for sitescore operations.
#[derive(Error, Debug)]
pub enum SiteScoreError {
    /// I/O errors (reading site or keyword files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input rejected at a component boundary (empty keyword, empty site, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation cancelled through a cancellation token.
    #[error("Operation cancelled: {0}")]
    OperationCancelled(String),

    /// Deadline exceeded.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Thread join errors
    #[error("Thread join error: {0}")]
    ThreadJoinError(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal invariant broken.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SiteScoreError.
pub type Result<T> = std::result::Result<T, SiteScoreError>;

impl SiteScoreError {
    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        SiteScoreError::InvalidInput(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SiteScoreError::InvalidConfig(msg.into())
    }

    /// Create a new cancelled error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        SiteScoreError::OperationCancelled(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        SiteScoreError::Timeout(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        SiteScoreError::Internal(msg.into())
    }

    /// Whether this error came from input validation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SiteScoreError::InvalidInput(_))
    }
}
