//! Layered error types

use pagemerge_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core configuration error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An input path does not exist
    #[error("input file not found: {}", path.display())]
    InputNotFound {
        /// The missing path
        path: PathBuf,
    },

    /// Input is not a JSON array of page records
    #[error("failed to parse {source_name}: {reason}")]
    Parse {
        /// Which input failed (file path or "<bytes>", "<reader>", ...)
        source_name: String,
        /// Parser message
        reason: String,
    },

    /// Engine configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Thread pool could not be created
    #[cfg(feature = "parallel")]
    #[error("parallel execution failed: {0}")]
    ParallelError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::IoError(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
