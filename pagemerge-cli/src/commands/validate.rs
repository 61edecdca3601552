//! Validate command implementation

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        match CliConfig::from_file(&self.config).and_then(|config| {
            config.validate()?;
            Ok(config)
        }) {
            Ok(config) => {
                let chunking = &config.chunking;
                println!("✓ Configuration is valid!");
                println!(
                    "  Chunking: target {} / overlap {} / min {} / max {}",
                    chunking.target_len, chunking.overlap, chunking.min_len, chunking.max_len
                );
                println!(
                    "  Headers/footers: threshold {} over at least {} pages",
                    config.boilerplate.frequency_threshold, config.boilerplate.min_pages
                );
                println!(
                    "  Offsets: {:?} ({})",
                    config.offset.candidates,
                    config.offset.tie_break.as_str()
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e}");
                Err(anyhow::anyhow!("Validation failed: {}", e))
            }
        }
    }
}
