//! CLI command implementations

use clap::Subcommand;

pub mod generate_config;
pub mod merge;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge two page extractions into one deduplicated chunk corpus
    Merge(merge::MergeArgs),

    /// Validate a configuration file
    Validate(validate::ValidateArgs),

    /// Write the default configuration as a commented TOML file
    GenerateConfig(generate_config::GenerateConfigArgs),
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Merge(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_commands_debug_format() {
        let validate = Commands::Validate(validate::ValidateArgs {
            config: PathBuf::from("pagemerge.toml"),
        });
        let debug_str = format!("{:?}", validate);
        assert!(debug_str.contains("Validate"));
        assert!(debug_str.contains("pagemerge.toml"));

        let generate = Commands::GenerateConfig(generate_config::GenerateConfigArgs {
            output: PathBuf::from("out.toml"),
            force: false,
        });
        assert!(format!("{:?}", generate).contains("GenerateConfig"));
    }
}
