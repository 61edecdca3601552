//! Error types for the core algorithms

use thiserror::Error;

/// Errors raised by the core layer
///
/// Malformed extraction records are not errors: the indexer skips and
/// counts them. The only fatal condition at this layer is a configuration
/// that cannot produce well-formed chunks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A configuration value is out of range or inconsistent
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Human readable description of the violated constraint
        reason: String,
    },
}

impl CoreError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        CoreError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
