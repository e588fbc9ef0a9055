//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Drive and calibrate MARTHE groundwater models with PEST++.
#[derive(Parser)]
#[command(name = "rmarthe")]
#[command(about = "Drive and calibrate MARTHE groundwater models with PEST++")]
#[command(version)]
pub struct Cli {
    /// Settings file used instead of `rmarthe.json` in the model directory
    #[arg(long, global = true, env = "RMARTHE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["rmarthe", "info", "mona.rma", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Info { .. })));
    }
}
