//! Reconciliation and rechunking of dual-source page extractions
//!
//! Two extraction back-ends run over the same documents and disagree on page
//! numbering, noise and segmentation. This crate holds the pure stages that
//! turn both outputs into one deduplicated, length-bounded chunk sequence:
//!
//! - **Indexing**: group raw records by normalized `(file, page)`
//! - **Offset reconciliation**: estimate a per-file page shift of the candidate
//! - **Boilerplate removal**: drop lines recurring on many pages of a file
//! - **Merging**: one text per page, baseline first
//! - **Rechunking**: sentence-aware packing with overlap
//! - **Deduplication**: exact, corpus-wide, first occurrence wins
//!
//! # Example
//!
//! ```rust
//! use pagemerge_core::{
//!     BoilerplateDetector, Deduplicator, OffsetEstimator, PageIndex, PageMerger,
//!     RawPageRecord, Rechunker,
//! };
//!
//! let baseline = vec![
//!     RawPageRecord::new("a.pdf", 0, "Alpha.\nFooter X"),
//!     RawPageRecord::new("a.pdf", 1, "Beta.\nFooter X"),
//! ];
//! let (baseline, _) = PageIndex::from_records(&baseline);
//! let candidate = PageIndex::new();
//!
//! let offsets = OffsetEstimator::default().estimate(&baseline, &candidate);
//! let candidate = candidate.apply_offsets(&offsets);
//! let boilerplate = BoilerplateDetector::default().detect(&[&baseline, &candidate]);
//! let merged = PageMerger::new(&boilerplate).merge(&baseline, &candidate);
//!
//! let rechunker = Rechunker::default();
//! let chunks: Vec<_> = merged.pages.iter().flat_map(|page| rechunker.rechunk_page(page)).collect();
//! let chunks = Deduplicator::new().dedup(chunks);
//!
//! assert_eq!(chunks.len(), 2);
//! assert!(chunks.iter().all(|chunk| !chunk.content.contains("Footer X")));
//! ```

pub mod boilerplate;
pub mod config;
pub mod dedup;
pub mod error;
pub mod index;
pub mod merge;
pub mod normalize;
pub mod offset;
pub mod record;
pub mod rechunk;
pub mod segment;

pub use boilerplate::{BoilerplateDetector, BoilerplateSet};
pub use config::{
    BoilerplateConfig, ChunkingConfig, OffsetConfig, PipelineConfig, PipelineConfigBuilder,
    SegmentationConfig,
};
pub use dedup::Deduplicator;
pub use error::{CoreError, Result};
pub use index::{IndexStats, PageIndex};
pub use merge::{MergeResult, MergedPage, PageMerger};
pub use normalize::{hash_text, normalize_filename, normalize_text, split_lines, ContentHash};
pub use offset::{OffsetDecision, OffsetEstimator, OffsetTable, TieBreak};
pub use record::{parse_page, Chunk, ChunkMetadata, PageKey, RawMetadata, RawPageRecord};
pub use rechunk::Rechunker;
pub use segment::{PunctuationSegmenter, SentenceSegmenter};
