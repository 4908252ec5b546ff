//! Error types for the index.

use thiserror::Error;

use crate::types::MIN_DEGREE;

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while configuring or verifying a tree
///
/// Missing keys are not errors: lookups and deletions report them as
/// `None` / `false`.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Minimum degree below the smallest legal branching factor
    #[error("Invalid minimum degree {0} (must be at least {})", MIN_DEGREE)]
    InvalidMinDegree(usize),

    /// Configuration could not be interpreted
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A structural invariant does not hold
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// Malformed JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    /// Create a corruption error with a message
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
