//! Execution strategies for per-page rechunking
//!
//! Pages are independent once merged, so rechunking is the only stage worth
//! spreading over threads. Every executor returns results in input order.

use crate::error::Result;
use pagemerge_core::{Chunk, MergedPage, Rechunker};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequential;

#[cfg(feature = "parallel")]
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Single-threaded sequential processing
    Sequential,
    /// Multi-threaded parallel processing
    Parallel,
    /// Parallel once the page count reaches the threshold
    #[default]
    Adaptive,
}

impl ExecutionMode {
    /// Lower-case name for logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Adaptive => "adaptive",
        }
    }
}

/// Trait for execution strategies
pub trait Executor: Send + Sync {
    /// Rechunk every page, one result per page in input order
    fn rechunk_pages(&self, pages: &[MergedPage], rechunker: &Rechunker) -> Result<Vec<Vec<Chunk>>>;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}

/// Resolve a requested mode to a concrete one for the given page count
pub fn auto_select(requested: ExecutionMode, page_count: usize, threshold: usize) -> ExecutionMode {
    match requested {
        ExecutionMode::Sequential => ExecutionMode::Sequential,
        ExecutionMode::Parallel | ExecutionMode::Adaptive => {
            if requested == ExecutionMode::Adaptive && page_count < threshold {
                return ExecutionMode::Sequential;
            }

            #[cfg(feature = "parallel")]
            return ExecutionMode::Parallel;

            #[cfg(not(feature = "parallel"))]
            ExecutionMode::Sequential
        }
    }
}
