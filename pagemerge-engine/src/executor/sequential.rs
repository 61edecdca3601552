//! Sequential execution strategy

use crate::{
    error::Result,
    executor::{ExecutionMode, Executor},
};
use pagemerge_core::{Chunk, MergedPage, Rechunker};

/// Sequential single-threaded executor
#[derive(Debug, Clone)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn rechunk_pages(&self, pages: &[MergedPage], rechunker: &Rechunker) -> Result<Vec<Vec<Chunk>>> {
        Ok(pages.iter().map(|page| rechunker.rechunk_page(page)).collect())
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }
}
