//! pagemerge command-line entry point

use anyhow::Result;
use clap::Parser;
use pagemerge_cli::commands::Commands;

/// Merge dual-source page extractions into a deduplicated chunk corpus
#[derive(Debug, Parser)]
#[command(name = "pagemerge", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
