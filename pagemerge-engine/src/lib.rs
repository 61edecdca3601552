//! Pipeline orchestration for dual-source page merging
//!
//! This crate wires the `pagemerge-core` stages into a runnable pipeline:
//! input loading, execution strategies for per-page rechunking, the run
//! report and atomic corpus output.
//!
//! ```rust
//! use pagemerge_engine::{Input, MergePipeline};
//!
//! let baseline = r#"[
//!     {"content": "Alpha.\nFooter X", "metadata": {"page": 0, "file_name": "a.pdf"}},
//!     {"content": "Beta.\nFooter X", "metadata": {"page": 1, "file_name": "a.pdf"}}
//! ]"#;
//!
//! let output = MergePipeline::new()
//!     .run(Input::from_json(baseline), Input::from_json("[]"))
//!     .unwrap();
//!
//! assert_eq!(output.chunks.len(), 2);
//! println!("{}", output.report.stats);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod executor;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod report;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use executor::{ExecutionMode, Executor};
pub use input::Input;
pub use output::{write_chunks_json, write_chunks_jsonl};
pub use pipeline::{MergeOutput, MergePipeline, MergePipelineBuilder, Stage};
pub use report::{ChunkStats, MergeReport, SourceReport};

// Re-export from core for convenience
pub use pagemerge_core::{Chunk, PipelineConfig, RawPageRecord, TieBreak};
