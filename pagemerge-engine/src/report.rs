//! Run report and corpus statistics

use crate::executor::ExecutionMode;
use pagemerge_core::{Chunk, IndexStats, OffsetTable};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Length statistics of the final corpus, in characters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChunkStats {
    /// Number of chunks
    pub count: usize,
    /// Mean content length
    pub mean_len: f64,
    /// Median content length
    pub median_len: f64,
}

impl ChunkStats {
    /// Compute statistics over a corpus
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let mut lengths: Vec<usize> = chunks.iter().map(Chunk::char_len).collect();
        if lengths.is_empty() {
            return Self::default();
        }
        lengths.sort_unstable();

        let count = lengths.len();
        let mean_len = lengths.iter().sum::<usize>() as f64 / count as f64;
        let mid = count / 2;
        let median_len = if count % 2 == 0 {
            (lengths[mid - 1] + lengths[mid]) as f64 / 2.0
        } else {
            lengths[mid] as f64
        };

        Self {
            count,
            mean_len,
            median_len,
        }
    }
}

impl fmt::Display for ChunkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chunks: {} | mean length: {:.1} | median length: {:.1}",
            self.count, self.mean_len, self.median_len
        )
    }
}

/// Indexing counters of one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    /// Records that contributed text
    pub accepted: usize,
    /// Records with an unparsable page
    pub skipped_page: usize,
    /// Records whose text was empty
    pub skipped_empty: usize,
    /// Distinct pages indexed
    pub pages: usize,
}

impl SourceReport {
    /// Build from indexer counters and the resulting page count
    pub fn new(stats: IndexStats, pages: usize) -> Self {
        Self {
            accepted: stats.accepted,
            skipped_page: stats.skipped_page,
            skipped_empty: stats.skipped_empty,
            pages,
        }
    }
}

/// Everything a run observed besides the chunks themselves
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    /// Baseline indexing counters
    pub baseline: SourceReport,
    /// Candidate indexing counters
    pub candidate: SourceReport,
    /// Page offset applied to each candidate file
    pub offsets: OffsetTable,
    /// Boilerplate lines detected per file
    pub boilerplate_lines: BTreeMap<String, usize>,
    /// Pages that kept text after merging
    pub pages_merged: usize,
    /// Pages that were entirely boilerplate
    pub pages_dropped: usize,
    /// Chunks produced before deduplication
    pub chunks_before_dedup: usize,
    /// Chunks removed as exact duplicates
    pub duplicates_removed: usize,
    /// Execution mode that actually ran
    pub execution_mode: ExecutionMode,
    /// Wall-clock time of the run
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    /// Length statistics of the output
    pub stats: ChunkStats,
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}
