//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use pagemerge_engine::Stage;
use std::time::Duration;

/// Progress reporter over the pipeline stages
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }

    /// Initialize the stage bar
    pub fn init_stages(&mut self) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(Stage::ALL.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} stages {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Mark the start of a stage
    pub fn stage_started(&self, stage: Stage) {
        if let Some(pb) = &self.progress_bar {
            let position = Stage::ALL.iter().position(|s| *s == stage).unwrap_or(0);
            pb.set_position(position as u64);
            pb.set_message(stage.label());
        }
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(Stage::ALL.len() as u64);
            pb.finish_and_clear();
        }
    }

    /// Whether a bar is being drawn
    pub fn is_active(&self) -> bool {
        self.progress_bar.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_has_no_bar() {
        let mut reporter = ProgressReporter::new(true);
        reporter.init_stages();
        assert!(!reporter.is_active());
        reporter.stage_started(Stage::Merging);
        reporter.finish();
    }

    #[test]
    fn test_stages_advance() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_stages();
        assert!(reporter.is_active());
        for stage in Stage::ALL {
            reporter.stage_started(stage);
        }
        reporter.finish();
    }
}
