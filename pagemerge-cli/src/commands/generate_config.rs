//! Generate config command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use pagemerge_core::config::defaults;
use pagemerge_engine::config::DEFAULT_PARALLEL_THRESHOLD;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        if self.output.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, generate_template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the values you want to change");
        println!("2. Validate your configuration:");
        println!("   pagemerge validate --config {}", self.output.display());
        println!("3. Use it for merging:");
        println!(
            "   pagemerge merge -b baseline.json -c candidate.json --config {}",
            self.output.display()
        );

        Ok(())
    }
}

/// Default configuration as commented TOML
pub fn generate_template() -> String {
    let terminators = defaults::TERMINATORS
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"# pagemerge configuration
#
# Every key is optional. Command-line flags override values set here.

[chunking]
# Greedy packing budget in characters
target_len = {target_len}
# Trailing characters repeated at the start of the next chunk of a page (0 = none)
overlap = {overlap}
# Chunks shorter than this are merged into a neighbour on the same page
min_len = {min_len}
# Chunks longer than this are split into fixed windows
max_len = {max_len}

[boilerplate]
# A line is a header/footer when it appears on at least this fraction of a file's pages
frequency_threshold = {frequency_threshold}
# ... and on at least this many distinct pages
min_pages = {min_pages}
# Lines outside this trimmed length range are never headers/footers
min_line_len = {min_line_len}
max_line_len = {max_line_len}

[offset]
# Page shifts tried when aligning the candidate source to the baseline
candidates = {candidates:?}
# "first-seen" keeps the earliest best offset, "nearest-zero" the smallest shift
tie_break = "first-seen"

[segmentation]
# Characters that end a sentence
terminators = [{terminators}]

[performance]
# "sequential", "parallel" or "adaptive"
execution_mode = "adaptive"
# Worker threads for parallel rechunking (0 = one per core)
worker_threads = 0
# Merged page count from which adaptive mode goes parallel
parallel_threshold = {parallel_threshold}

[output]
# "json" (pretty array) or "jsonl" (one chunk per line)
format = "json"
"#,
        target_len = defaults::TARGET_LEN,
        overlap = defaults::OVERLAP,
        min_len = defaults::MIN_LEN,
        max_len = defaults::MAX_LEN,
        frequency_threshold = defaults::FREQUENCY_THRESHOLD,
        min_pages = defaults::MIN_PAGES,
        min_line_len = defaults::MIN_LINE_LEN,
        max_line_len = defaults::MAX_LINE_LEN,
        candidates = defaults::OFFSET_CANDIDATES,
        terminators = terminators,
        parallel_threshold = DEFAULT_PARALLEL_THRESHOLD,
    )
}
