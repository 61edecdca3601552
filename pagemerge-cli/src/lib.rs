//! pagemerge CLI library
//!
//! Argument types, configuration file handling and output helpers behind the
//! `pagemerge` binary.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
