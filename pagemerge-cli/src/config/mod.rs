//! Configuration file support
//!
//! A TOML file holds the pipeline sections (`[chunking]`, `[boilerplate]`,
//! `[offset]`, `[segmentation]`) plus CLI-only `[performance]` and `[output]`
//! sections. Every key is optional; missing keys take the built-in defaults.

use crate::error::CliError;
use crate::output::OutputFormat;
use pagemerge_core::{
    BoilerplateConfig, ChunkingConfig, OffsetConfig, PipelineConfig, SegmentationConfig,
};
use pagemerge_engine::{config::DEFAULT_PARALLEL_THRESHOLD, EngineConfig, ExecutionMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Rechunking parameters
    pub chunking: ChunkingConfig,
    /// Header/footer detection parameters
    pub boilerplate: BoilerplateConfig,
    /// Page offset search parameters
    pub offset: OffsetConfig,
    /// Sentence segmentation parameters
    pub segmentation: SegmentationConfig,
    /// Execution settings
    pub performance: PerformanceConfig,
    /// Output settings
    pub output: OutputConfig,
}

/// Performance-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// sequential, parallel or adaptive
    pub execution_mode: ExecutionMode,
    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
    /// Merged page count from which adaptive mode goes parallel
    pub parallel_threshold: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            execution_mode: ExecutionMode::Adaptive,
            worker_threads: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,
}

impl CliConfig {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|e| {
            CliError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Pipeline sections as a core configuration (not yet validated)
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            chunking: self.chunking.clone(),
            boilerplate: self.boilerplate.clone(),
            offset: self.offset.clone(),
            segmentation: self.segmentation.clone(),
        }
    }

    /// Performance section as an engine configuration
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            execution_mode: self.performance.execution_mode,
            threads: match self.performance.worker_threads {
                0 => None,
                n => Some(n),
            },
            parallel_threshold: self.performance.parallel_threshold,
        }
    }

    /// Validate the pipeline sections
    pub fn validate(&self) -> Result<(), CliError> {
        self.pipeline_config()
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagemerge_core::TieBreak;

    #[test]
    fn test_empty_file_is_default() {
        let config = CliConfig::from_toml("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.pipeline_config(), PipelineConfig::default());
        assert_eq!(config.engine_config(), EngineConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = CliConfig::from_toml(
            r#"
[chunking]
target_len = 500
overlap = 50

[offset]
candidates = [-1, 0, 1]
tie_break = "nearest-zero"

[performance]
execution_mode = "sequential"
worker_threads = 2

[output]
format = "jsonl"
"#,
        )
        .unwrap();

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.chunking.target_len, 500);
        assert_eq!(pipeline.chunking.overlap, 50);
        assert_eq!(pipeline.chunking.max_len, ChunkingConfig::default().max_len);
        assert_eq!(pipeline.offset.candidates, vec![-1, 0, 1]);
        assert_eq!(pipeline.offset.tie_break, TieBreak::NearestZero);

        let engine = config.engine_config();
        assert_eq!(engine.execution_mode, ExecutionMode::Sequential);
        assert_eq!(engine.threads, Some(2));
        assert_eq!(config.output.format, OutputFormat::Jsonl);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(CliConfig::from_toml("[chunkng]\ntarget_len = 5\n").is_err());
    }

    #[test]
    fn test_validate_reports_out_of_range() {
        let config = CliConfig::from_toml("[chunking]\ntarget_len = 100\noverlap = 100\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::from_file(Path::new("/nonexistent/pagemerge.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
