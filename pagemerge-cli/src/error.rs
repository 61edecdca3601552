//! Error handling for the CLI application

use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific failures
#[derive(Debug, Error)]
pub enum CliError {
    /// An input path does not exist or is not a file
    #[error("{role} file not found: {}", path.display())]
    FileNotFound {
        /// Which input ("baseline", "candidate")
        role: &'static str,
        /// The path given on the command line
        path: PathBuf,
    },
    /// Configuration file could not be parsed or holds invalid values
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
