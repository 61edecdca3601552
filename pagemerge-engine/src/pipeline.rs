//! The merge pipeline and its builder
//!
//! Stages run strictly in order and never loop back:
//! load, index, align offsets, detect boilerplate, merge pages, rechunk,
//! deduplicate. Only rechunking may fan out over threads.

use crate::{
    config::EngineConfig,
    error::{EngineError, Result},
    executor::{auto_select, ExecutionMode, Executor, SequentialExecutor},
    input::Input,
    report::{ChunkStats, MergeReport, SourceReport},
};
use pagemerge_core::{
    BoilerplateDetector, Chunk, Deduplicator, OffsetEstimator, PageIndex, PageMerger,
    PipelineConfig, PunctuationSegmenter, Rechunker, SentenceSegmenter,
};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "parallel")]
use crate::executor::ParallelExecutor;

/// Pipeline stage, reported to observers as it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading and parsing both inputs
    Loading,
    /// Grouping records by page
    Indexing,
    /// Estimating per-file page offsets
    Aligning,
    /// Detecting recurring header/footer lines
    DetectingBoilerplate,
    /// Merging page texts
    Merging,
    /// Rechunking pages
    Rechunking,
    /// Removing duplicate chunks
    Deduplicating,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 7] = [
        Stage::Loading,
        Stage::Indexing,
        Stage::Aligning,
        Stage::DetectingBoilerplate,
        Stage::Merging,
        Stage::Rechunking,
        Stage::Deduplicating,
    ];

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Loading => "loading inputs",
            Stage::Indexing => "indexing pages",
            Stage::Aligning => "aligning page offsets",
            Stage::DetectingBoilerplate => "detecting headers and footers",
            Stage::Merging => "merging pages",
            Stage::Rechunking => "rechunking",
            Stage::Deduplicating => "deduplicating",
        }
    }
}

/// Result of a run: the corpus plus what was observed producing it
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// Deduplicated chunks in page order
    pub chunks: Vec<Chunk>,
    /// Run report
    pub report: MergeReport,
}

/// Reconciles two extraction sources into one chunk corpus
pub struct MergePipeline {
    config: PipelineConfig,
    engine: EngineConfig,
    segmenter: Arc<dyn SentenceSegmenter>,
}

impl std::fmt::Debug for MergePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergePipeline")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl MergePipeline {
    /// Create a pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            engine: EngineConfig::default(),
            segmenter: Arc::new(PunctuationSegmenter::default()),
        }
    }

    /// Create a new builder
    pub fn builder() -> MergePipelineBuilder {
        MergePipelineBuilder::new()
    }

    /// Pipeline configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Engine configuration in use
    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    /// Run the pipeline on a baseline and a candidate source
    pub fn run(&self, baseline: Input, candidate: Input) -> Result<MergeOutput> {
        self.run_with_observer(baseline, candidate, &mut |_| {})
    }

    /// Run the pipeline, calling `observer` as each stage starts
    pub fn run_with_observer(
        &self,
        baseline: Input,
        candidate: Input,
        observer: &mut dyn FnMut(Stage),
    ) -> Result<MergeOutput> {
        let start = Instant::now();
        let mut report = MergeReport::default();

        observer(Stage::Loading);
        baseline.check_exists()?;
        candidate.check_exists()?;
        let baseline_records = baseline.into_records()?;
        let candidate_records = candidate.into_records()?;
        log::info!(
            "loaded {} baseline and {} candidate records",
            baseline_records.len(),
            candidate_records.len()
        );

        observer(Stage::Indexing);
        let (baseline, baseline_stats) = PageIndex::from_records(&baseline_records);
        let (candidate, candidate_stats) = PageIndex::from_records(&candidate_records);
        drop((baseline_records, candidate_records));
        report.baseline = SourceReport::new(baseline_stats, baseline.len());
        report.candidate = SourceReport::new(candidate_stats, candidate.len());
        for (name, stats) in [("baseline", baseline_stats), ("candidate", candidate_stats)] {
            log::info!(
                "{name}: {} records indexed, {} with unparsable page, {} empty",
                stats.accepted,
                stats.skipped_page,
                stats.skipped_empty
            );
        }

        observer(Stage::Aligning);
        let offsets = OffsetEstimator::from_config(&self.config.offset).estimate(&baseline, &candidate);
        for (file_name, offset) in offsets.iter() {
            log::debug!("offset for {file_name}: {offset:+}");
        }
        for (file_name, offset) in offsets.shifted_files() {
            log::info!("shifting candidate pages of {file_name} by {offset:+}");
        }
        let candidate = candidate.apply_offsets(&offsets);

        observer(Stage::DetectingBoilerplate);
        let boilerplate =
            BoilerplateDetector::new(self.config.boilerplate.clone()).detect(&[&baseline, &candidate]);
        log::info!("{} boilerplate lines detected", boilerplate.total_lines());
        if log::log_enabled!(log::Level::Debug) {
            for file_name in boilerplate.counts().keys() {
                let mut lines: Vec<&String> = boilerplate
                    .lines_for(file_name)
                    .map(|lines| lines.iter().collect())
                    .unwrap_or_default();
                lines.sort();
                log::debug!("boilerplate in {file_name}: {lines:?}");
            }
        }

        observer(Stage::Merging);
        let merged = PageMerger::new(&boilerplate).merge(&baseline, &candidate);
        log::info!(
            "{} pages merged, {} dropped as boilerplate-only",
            merged.pages.len(),
            merged.dropped
        );

        observer(Stage::Rechunking);
        let mode = auto_select(
            self.engine.execution_mode,
            merged.pages.len(),
            self.engine.parallel_threshold,
        );
        let rechunker = Rechunker::with_segmenter(self.config.chunking.clone(), self.segmenter.clone());
        let executor = self.executor(mode);
        let per_page = executor.rechunk_pages(&merged.pages, &rechunker)?;
        let chunks: Vec<Chunk> = per_page.into_iter().flatten().collect();
        log::info!(
            "{} chunks before deduplication ({} mode)",
            chunks.len(),
            executor.mode().as_str()
        );

        observer(Stage::Deduplicating);
        let chunks_before_dedup = chunks.len();
        let mut dedup = Deduplicator::new();
        let chunks = dedup.dedup(chunks);
        log::info!("{} duplicate chunks removed", dedup.duplicates());

        report.offsets = offsets;
        report.boilerplate_lines = boilerplate.counts();
        report.pages_merged = merged.pages.len();
        report.pages_dropped = merged.dropped;
        report.chunks_before_dedup = chunks_before_dedup;
        report.duplicates_removed = dedup.duplicates();
        report.execution_mode = executor.mode();
        report.stats = ChunkStats::from_chunks(&chunks);
        report.elapsed = start.elapsed();

        Ok(MergeOutput { chunks, report })
    }

    fn executor(&self, mode: ExecutionMode) -> Box<dyn Executor> {
        match mode {
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => Box::new(ParallelExecutor::new(self.engine.threads)),
            _ => Box::new(SequentialExecutor),
        }
    }
}

impl Default for MergePipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for MergePipeline
///
/// Provides a fluent interface for configuring the pipeline.
pub struct MergePipelineBuilder {
    config: PipelineConfig,
    engine: EngineConfig,
    segmenter: Option<Arc<dyn SentenceSegmenter>>,
}

impl Default for MergePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MergePipelineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            engine: EngineConfig::default(),
            segmenter: None,
        }
    }

    /// Set the pipeline configuration
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the engine configuration
    pub fn engine_config(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.engine.execution_mode = mode;
        self
    }

    /// Set the thread count
    pub fn threads(mut self, count: Option<usize>) -> Self {
        self.engine.threads = count;
        self
    }

    /// Set the adaptive page-count threshold
    pub fn parallel_threshold(mut self, pages: usize) -> Self {
        self.engine.parallel_threshold = pages;
        self
    }

    /// Replace the sentence segmenter
    pub fn segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    /// Build the pipeline, validating the configuration
    pub fn build(self) -> Result<MergePipeline> {
        self.config.validate()?;
        if self.engine.threads == Some(0) {
            return Err(EngineError::ConfigError(
                "threads must be greater than 0".to_string(),
            ));
        }

        let segmenter = self.segmenter.unwrap_or_else(|| {
            Arc::new(PunctuationSegmenter::from_config(&self.config.segmentation))
        });

        Ok(MergePipeline {
            config: self.config,
            engine: self.engine,
            segmenter,
        })
    }
}
