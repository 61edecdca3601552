//! Tunable parameters of the merge pipeline
//!
//! Every section deserializes with per-field defaults, so a configuration
//! file only needs the values it changes. [`PipelineConfig::validate`] is
//! run before any input is read.

use crate::error::{CoreError, Result};
use crate::offset::TieBreak;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default configuration constants
pub mod defaults {
    /// Target chunk length in characters
    pub const TARGET_LEN: usize = 800;

    /// Trailing characters carried into the next chunk of the same page
    pub const OVERLAP: usize = 120;

    /// Chunks shorter than this are merged into their neighbour
    pub const MIN_LEN: usize = 60;

    /// Chunks longer than this are force-split
    pub const MAX_LEN: usize = 1400;

    /// Fraction of a file's pages a line must appear on to be boilerplate
    pub const FREQUENCY_THRESHOLD: f64 = 0.30;

    /// Shorter lines are noise, never boilerplate candidates
    pub const MIN_LINE_LEN: usize = 3;

    /// Longer lines are content, never boilerplate
    pub const MAX_LINE_LEN: usize = 120;

    /// A line must recur on at least this many pages to be boilerplate
    pub const MIN_PAGES: usize = 2;

    /// Page offsets tried when aligning the candidate source
    pub const OFFSET_CANDIDATES: [i64; 5] = [-2, -1, 0, 1, 2];

    /// Sentence terminators, ASCII and full-width
    pub const TERMINATORS: [char; 8] = ['。', '！', '？', '!', '?', ';', '；', '.'];
}

/// Full pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rechunking parameters
    pub chunking: ChunkingConfig,
    /// Header/footer detection parameters
    pub boilerplate: BoilerplateConfig,
    /// Page offset search parameters
    pub offset: OffsetConfig,
    /// Sentence segmentation parameters
    pub segmentation: SegmentationConfig,
}

/// Rechunking parameters, all lengths in characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Greedy packing budget
    pub target_len: usize,
    /// Overlap carried between consecutive chunks of a page
    pub overlap: usize,
    /// Minimum chunk length before merging
    pub min_len: usize,
    /// Maximum chunk length before force-splitting
    pub max_len: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_len: defaults::TARGET_LEN,
            overlap: defaults::OVERLAP,
            min_len: defaults::MIN_LEN,
            max_len: defaults::MAX_LEN,
        }
    }
}

impl ChunkingConfig {
    /// Length of a force-split window
    pub fn window_len(&self) -> usize {
        self.target_len + self.overlap
    }

    /// Longest chunk the rechunker may emit
    pub fn upper_bound(&self) -> usize {
        self.max_len.max(self.window_len())
    }
}

/// Header/footer detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoilerplateConfig {
    /// Minimum fraction of pages a line must appear on
    pub frequency_threshold: f64,
    /// Minimum trimmed line length to be considered
    pub min_line_len: usize,
    /// Maximum trimmed line length to be considered
    pub max_line_len: usize,
    /// Minimum number of distinct pages a line must appear on
    pub min_pages: usize,
}

impl Default for BoilerplateConfig {
    fn default() -> Self {
        Self {
            frequency_threshold: defaults::FREQUENCY_THRESHOLD,
            min_line_len: defaults::MIN_LINE_LEN,
            max_line_len: defaults::MAX_LINE_LEN,
            min_pages: defaults::MIN_PAGES,
        }
    }
}

/// Page offset search parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetConfig {
    /// Offsets to try, in order
    pub candidates: Vec<i64>,
    /// Policy for equal overlaps
    pub tie_break: TieBreak,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            candidates: defaults::OFFSET_CANDIDATES.to_vec(),
            tie_break: TieBreak::default(),
        }
    }
}

/// Sentence segmentation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Characters that end a sentence-like segment
    pub terminators: Vec<char>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            terminators: defaults::TERMINATORS.to_vec(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new builder for PipelineConfig
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.boilerplate.validate()?;
        self.offset.validate()?;
        self.segmentation.validate()
    }
}

impl ChunkingConfig {
    fn validate(&self) -> Result<()> {
        if self.target_len == 0 {
            return Err(CoreError::invalid_config(
                "target_len must be greater than 0",
            ));
        }

        if self.overlap >= self.target_len {
            return Err(CoreError::invalid_config(format!(
                "overlap ({}) must be less than target_len ({})",
                self.overlap, self.target_len
            )));
        }

        if self.min_len > self.target_len {
            return Err(CoreError::invalid_config(format!(
                "min_len ({}) must not exceed target_len ({})",
                self.min_len, self.target_len
            )));
        }

        if self.max_len < self.target_len {
            return Err(CoreError::invalid_config(format!(
                "max_len ({}) must be at least target_len ({})",
                self.max_len, self.target_len
            )));
        }

        Ok(())
    }
}

impl BoilerplateConfig {
    fn validate(&self) -> Result<()> {
        if !(self.frequency_threshold > 0.0 && self.frequency_threshold <= 1.0) {
            return Err(CoreError::invalid_config(format!(
                "frequency_threshold ({}) must be in (0, 1]",
                self.frequency_threshold
            )));
        }

        if self.max_line_len == 0 {
            return Err(CoreError::invalid_config(
                "max_line_len must be greater than 0",
            ));
        }

        if self.min_pages == 0 {
            return Err(CoreError::invalid_config(
                "min_pages must be greater than 0",
            ));
        }

        if self.min_line_len > self.max_line_len {
            return Err(CoreError::invalid_config(format!(
                "min_line_len ({}) must not exceed max_line_len ({})",
                self.min_line_len, self.max_line_len
            )));
        }

        Ok(())
    }
}

impl OffsetConfig {
    fn validate(&self) -> Result<()> {
        if self.candidates.is_empty() {
            return Err(CoreError::invalid_config(
                "offset candidates must not be empty",
            ));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.candidates.iter().find(|offset| !seen.insert(**offset)) {
            return Err(CoreError::invalid_config(format!(
                "offset candidate {duplicate} is listed more than once"
            )));
        }

        Ok(())
    }
}

impl SegmentationConfig {
    fn validate(&self) -> Result<()> {
        if self.terminators.is_empty() {
            return Err(CoreError::invalid_config(
                "at least one sentence terminator is required",
            ));
        }
        Ok(())
    }
}

/// Builder for PipelineConfig with fluent API
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Sets the target chunk length
    pub fn target_len(mut self, len: usize) -> Self {
        self.config.chunking.target_len = len;
        self
    }

    /// Sets the overlap length
    pub fn overlap(mut self, len: usize) -> Self {
        self.config.chunking.overlap = len;
        self
    }

    /// Sets the minimum chunk length
    pub fn min_len(mut self, len: usize) -> Self {
        self.config.chunking.min_len = len;
        self
    }

    /// Sets the maximum chunk length
    pub fn max_len(mut self, len: usize) -> Self {
        self.config.chunking.max_len = len;
        self
    }

    /// Sets the boilerplate frequency threshold
    pub fn frequency_threshold(mut self, threshold: f64) -> Self {
        self.config.boilerplate.frequency_threshold = threshold;
        self
    }

    /// Sets the minimum boilerplate candidate line length
    pub fn min_line_len(mut self, len: usize) -> Self {
        self.config.boilerplate.min_line_len = len;
        self
    }

    /// Sets the maximum boilerplate line length
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.boilerplate.max_line_len = len;
        self
    }

    /// Sets the minimum number of pages a boilerplate line recurs on
    pub fn min_pages(mut self, pages: usize) -> Self {
        self.config.boilerplate.min_pages = pages;
        self
    }

    /// Sets the offsets tried during alignment
    pub fn offset_candidates(mut self, candidates: Vec<i64>) -> Self {
        self.config.offset.candidates = candidates;
        self
    }

    /// Sets the offset tie-break policy
    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.config.offset.tie_break = tie_break;
        self
    }

    /// Sets the sentence terminators
    pub fn terminators(mut self, terminators: Vec<char>) -> Self {
        self.config.segmentation.terminators = terminators;
        self
    }

    /// Builds the configuration, validating parameters
    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Builds the configuration without validation (for testing)
    pub fn build_unchecked(self) -> PipelineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.chunking.target_len, 800);
        assert_eq!(config.chunking.overlap, 120);
        assert_eq!(config.chunking.min_len, 60);
        assert_eq!(config.chunking.max_len, 1400);
        assert_eq!(config.boilerplate.frequency_threshold, 0.30);
        assert_eq!(config.boilerplate.max_line_len, 120);
        assert_eq!(config.boilerplate.min_pages, 2);
        assert_eq!(config.offset.candidates, vec![-2, -1, 0, 1, 2]);
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.upper_bound(), 1400);
    }

    #[test]
    fn test_config_validation() {
        let invalid = [
            PipelineConfig::builder().target_len(0),
            PipelineConfig::builder().target_len(100).overlap(100),
            PipelineConfig::builder().target_len(100).overlap(10).min_len(200),
            PipelineConfig::builder().target_len(900).max_len(800),
            PipelineConfig::builder().frequency_threshold(0.0),
            PipelineConfig::builder().frequency_threshold(1.5),
            PipelineConfig::builder().frequency_threshold(f64::NAN),
            PipelineConfig::builder().min_line_len(50).max_line_len(10),
            PipelineConfig::builder().min_pages(0),
            PipelineConfig::builder().offset_candidates(vec![]),
            PipelineConfig::builder().offset_candidates(vec![0, 1, 0]),
            PipelineConfig::builder().terminators(vec![]),
        ];

        for builder in invalid {
            let config = builder.build_unchecked();
            assert!(
                matches!(config.validate(), Err(CoreError::InvalidConfig { .. })),
                "expected rejection of {config:?}"
            );
        }
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = PipelineConfig::builder()
            .target_len(400)
            .overlap(40)
            .min_len(20)
            .max_len(700)
            .tie_break(TieBreak::NearestZero)
            .offset_candidates(vec![0, -1, 1])
            .build()
            .unwrap();

        assert_eq!(config.chunking.window_len(), 440);
        assert_eq!(config.chunking.upper_bound(), 700);
        assert_eq!(config.offset.tie_break, TieBreak::NearestZero);
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"chunking": {"target_len": 500}, "offset": {"tie_break": "nearest-zero"}}"#,
        )
        .unwrap();

        assert_eq!(config.chunking.target_len, 500);
        assert_eq!(config.chunking.overlap, 120);
        assert_eq!(config.offset.tie_break, TieBreak::NearestZero);
        assert_eq!(config.boilerplate, BoilerplateConfig::default());
    }
}
