//! Merge command implementation

use crate::config::CliConfig;
use crate::input::resolve_input;
use crate::output::{self, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use pagemerge_core::{PipelineConfig, TieBreak};
use pagemerge_engine::{
    output::write_atomically, EngineConfig, ExecutionMode, MergePipeline, MergeReport,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Arguments for the merge command
#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Baseline extraction (JSON array of page records)
    #[arg(short, long, value_name = "FILE", required = true)]
    pub baseline: PathBuf,

    /// Candidate extraction (JSON array of page records)
    #[arg(short, long, value_name = "FILE", required = true)]
    pub candidate: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE", env = "PAGEMERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format [default: json]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also write the run report as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Target chunk length in characters
    #[arg(long, value_name = "N")]
    pub target_len: Option<usize>,

    /// Characters carried over between consecutive chunks of a page
    #[arg(long, value_name = "N")]
    pub overlap: Option<usize>,

    /// Chunks shorter than this are merged into a neighbour
    #[arg(long, value_name = "N")]
    pub min_len: Option<usize>,

    /// Chunks longer than this are force-split
    #[arg(long, value_name = "N")]
    pub max_len: Option<usize>,

    /// Fraction of a file's pages a line must appear on to be a header/footer
    #[arg(long, value_name = "F")]
    pub hf_threshold: Option<f64>,

    /// Minimum number of pages a header/footer line must appear on
    #[arg(long, value_name = "N")]
    pub hf_min_pages: Option<usize>,

    /// Shortest line considered for header/footer detection
    #[arg(long, value_name = "N")]
    pub min_line_len: Option<usize>,

    /// Longest line considered for header/footer detection
    #[arg(long, value_name = "N")]
    pub max_line_len: Option<usize>,

    /// Candidate page offsets to try, comma separated (e.g. -2,-1,0,1,2)
    #[arg(
        long,
        value_name = "LIST",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub offsets: Option<Vec<i64>>,

    /// How to choose between offsets with equal overlap
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreakArg>,

    /// Force parallel rechunking even for small inputs
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of worker threads
    #[arg(short = 't', long, value_name = "N", env = "PAGEMERGE_THREADS")]
    pub threads: Option<usize>,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Offset tie-break policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TieBreakArg {
    /// Earliest offset in search order
    FirstSeen,
    /// Smallest magnitude, then search order
    NearestZero,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::FirstSeen => TieBreak::FirstSeen,
            TieBreakArg::NearestZero => TieBreak::NearestZero,
        }
    }
}

/// Settings resolved from the configuration file and flags
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// Validated pipeline configuration
    pub pipeline: PipelineConfig,
    /// Execution settings
    pub engine: EngineConfig,
    /// Output format
    pub format: OutputFormat,
}

impl MergeArgs {
    /// Execute the merge command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();

        log::info!("Starting merge");
        log::debug!("Arguments: {:?}", self);

        let settings = self.resolve_settings()?;
        let pipeline = MergePipeline::builder()
            .config(settings.pipeline)
            .engine_config(settings.engine)
            .build()
            .context("Invalid configuration")?;

        let baseline = resolve_input(&self.baseline, "baseline")?;
        let candidate = resolve_input(&self.candidate, "candidate")?;

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_stages();
        let result = pipeline.run_with_observer(baseline, candidate, &mut |stage| {
            log::debug!("stage: {}", stage.label());
            progress.stage_started(stage);
        });
        progress.finish();
        let merged = result.context("Merge failed")?;

        // The report goes first so a failed report write leaves no corpus behind
        if let Some(path) = &self.report {
            write_report(path, &merged.report)?;
        }
        output::emit(settings.format, self.output.as_deref(), &merged.chunks)?;

        log::info!(
            "Finished in {:.1} ms",
            merged.report.elapsed.as_secs_f64() * 1000.0
        );
        if !self.quiet {
            eprintln!("{}", merged.report.stats);
        }

        Ok(())
    }

    /// Merge the configuration file (if any) with command-line overrides
    ///
    /// The result is validated before any input is touched.
    pub fn resolve_settings(&self) -> Result<ResolvedSettings> {
        let file_config = match &self.config {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                CliConfig::from_file(path)?
            }
            None => CliConfig::default(),
        };

        let mut pipeline = file_config.pipeline_config();
        self.apply_overrides(&mut pipeline);
        pipeline.validate().context("Invalid configuration")?;

        let mut engine = file_config.engine_config();
        if self.parallel {
            engine.execution_mode = ExecutionMode::Parallel;
        }
        if self.threads.is_some() {
            engine.threads = self.threads;
        }

        Ok(ResolvedSettings {
            pipeline,
            engine,
            format: self.format.unwrap_or(file_config.output.format),
        })
    }

    fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(len) = self.target_len {
            config.chunking.target_len = len;
        }
        if let Some(len) = self.overlap {
            config.chunking.overlap = len;
        }
        if let Some(len) = self.min_len {
            config.chunking.min_len = len;
        }
        if let Some(len) = self.max_len {
            config.chunking.max_len = len;
        }
        if let Some(threshold) = self.hf_threshold {
            config.boilerplate.frequency_threshold = threshold;
        }
        if let Some(pages) = self.hf_min_pages {
            config.boilerplate.min_pages = pages;
        }
        if let Some(len) = self.min_line_len {
            config.boilerplate.min_line_len = len;
        }
        if let Some(len) = self.max_line_len {
            config.boilerplate.max_line_len = len;
        }
        if let Some(offsets) = &self.offsets {
            config.offset.candidates = offsets.clone();
        }
        if let Some(tie_break) = self.tie_break {
            config.offset.tie_break = tie_break.into();
        }
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        // A logger may already be installed when running in-process
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(log_level),
        )
        .try_init();
    }
}

fn write_report(path: &Path, report: &MergeReport) -> Result<()> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, report)
            .map_err(|e| pagemerge_engine::EngineError::IoError(e.to_string()))?;
        writeln!(writer)?;
        Ok(())
    })
    .with_context(|| format!("Failed to write report to {}", path.display()))
}
