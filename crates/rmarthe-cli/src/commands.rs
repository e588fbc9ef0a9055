//! Main commands enum and primary subcommands.

use std::path::PathBuf;

use clap::Subcommand;

use crate::field_commands::FieldCommand;
use crate::optim_commands::OptimCommand;

/// A point `x,y,layer` with a 0-based layer.
pub type Point = (f64, f64, usize);

/// Parse `x,y,layer`.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, layer] = parts.as_slice() else {
        return Err(format!("expected x,y,layer, got '{s}'"));
    };
    let x = x.parse().map_err(|_| format!("invalid x '{x}'"))?;
    let y = y.parse().map_err(|_| format!("invalid y '{y}'"))?;
    let layer = layer.parse().map_err(|_| format!("invalid layer '{layer}'"))?;
    Ok((x, y, layer))
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the project layout, grid size and schedule of a model
    Info {
        /// MARTHE project file (.rma)
        rma: PathBuf,
    },

    /// Inspect and edit a gridded property
    Field {
        #[command(subcommand)]
        command: FieldCommand,
    },

    /// Extract simulated time series from chasim.out
    Series {
        /// MARTHE project file (.rma)
        rma: PathBuf,
        /// Simulated field name (e.g. CHARGE)
        field: String,
        /// Point as x,y,layer (0-based layer); repeat for several points
        #[arg(long = "point", required = true, value_parser = parse_point)]
        points: Vec<Point>,
        /// Column names, one per point
        #[arg(long = "name")]
        names: Vec<String>,
        /// Time steps to load (all when omitted)
        #[arg(long = "istep")]
        isteps: Vec<i64>,
        /// Simulated fields file (default: chasim.out in the model directory)
        #[arg(long)]
        chasim: Option<PathBuf>,
        /// Index base of the default column names (0 keeps the 0-based cell indices)
        #[arg(long, default_value_t = 0)]
        base: usize,
    },

    /// Build a PEST++ calibration case
    Optim {
        #[command(subcommand)]
        command: OptimCommand,
    },

    /// Run one model evaluation: apply parameters, run MARTHE, write simulated values
    ForwardRun {
        /// Case registry (<case>.json)
        registry: PathBuf,
    },

    /// Run PEST++ on a written case
    RunPest {
        /// Case registry (<case>.json)
        registry: PathBuf,
        /// PEST++ program looked up on PATH when no executable is configured
        #[arg(long)]
        program: Option<String>,
    },

    /// Show which MARTHE and PEST++ executables would be used
    CheckExe {
        /// Model directory holding rmarthe.json
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cli;
    use clap::Parser;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("10.5, 20,1"), Ok((10.5, 20.0, 1)));
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("1,2,-1").is_err());
    }

    #[test]
    fn test_series_args() {
        let cli = Cli::parse_from([
            "rmarthe", "series", "mona.rma", "CHARGE", "--point", "5,5,0", "--point", "15,5,1",
            "--istep", "2",
        ]);
        match cli.command {
            Some(Commands::Series { points, isteps, base, .. }) => {
                assert_eq!(points, vec![(5.0, 5.0, 0), (15.0, 5.0, 1)]);
                assert_eq!(isteps, vec![2]);
                assert_eq!(base, 0);
            }
            _ => panic!("expected series"),
        }

        let cli = Cli::parse_from([
            "rmarthe", "series", "mona.rma", "CHARGE", "--point", "5,5,0", "--base", "1",
        ]);
        assert!(matches!(cli.command, Some(Commands::Series { base: 1, .. })));
    }
}
