//! Parallel execution strategy

use crate::{
    error::{EngineError, Result},
    executor::{ExecutionMode, Executor},
};
use pagemerge_core::{Chunk, MergedPage, Rechunker};
use rayon::prelude::*;

/// Parallel multi-threaded executor
#[derive(Debug, Clone, Default)]
pub struct ParallelExecutor {
    threads: Option<usize>,
}

impl ParallelExecutor {
    /// Create a new parallel executor; `None` uses rayon's default width
    pub fn new(threads: Option<usize>) -> Self {
        Self { threads }
    }

    fn rechunk_all(pages: &[MergedPage], rechunker: &Rechunker) -> Vec<Vec<Chunk>> {
        // Indexed parallel collect keeps input order
        pages
            .par_iter()
            .map(|page| rechunker.rechunk_page(page))
            .collect()
    }
}

impl Executor for ParallelExecutor {
    fn rechunk_pages(&self, pages: &[MergedPage], rechunker: &Rechunker) -> Result<Vec<Vec<Chunk>>> {
        let Some(threads) = self.threads else {
            return Ok(Self::rechunk_all(pages, rechunker));
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| EngineError::ParallelError(e.to_string()))?;

        Ok(pool.install(|| Self::rechunk_all(pages, rechunker)))
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Parallel
    }
}
