//! PEST++ case subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use rmarthe_core::Transform;
use rmarthe_pest::ParameterOptions;

/// Parse a `key=value` PEST++ option.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty option name in '{s}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Bounds and transformation shared by every parameter kind.
#[derive(Args, Debug, Clone)]
pub struct ParamArgs {
    /// Lower bound, untransformed
    #[arg(long, allow_negative_numbers = true)]
    pub lbnd: Option<f64>,
    /// Upper bound, untransformed
    #[arg(long, allow_negative_numbers = true)]
    pub ubnd: Option<f64>,
    /// Transformation of values in PEST++ files
    #[arg(long, default_value = "none")]
    pub trans: Transform,
    /// Relative derivative increment
    #[arg(long, default_value_t = 0.01)]
    pub derinc: f64,
}

impl From<&ParamArgs> for ParameterOptions {
    fn from(args: &ParamArgs) -> Self {
        Self {
            lbnd: args.lbnd,
            ubnd: args.ubnd,
            transform: args.trans,
            derinc: args.derinc,
        }
    }
}

#[derive(Subcommand)]
pub enum OptimCommand {
    /// Create a case registry
    Init {
        /// Case name (<name>.pst, <name>.json)
        name: String,
        /// MARTHE project file (.rma)
        rma: PathBuf,
        /// Case directory holding par/, tpl/, ins/, sim/
        #[arg(long, default_value = "calib")]
        root: PathBuf,
        /// PEST++ NOPTMAX
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        noptmax: i32,
        /// PEST++ option as key=value; repeat for several
        #[arg(long = "option", value_parser = parse_key_value)]
        options: Vec<(String, String)>,
        /// Model command PEST++ runs (default: rmarthe forward-run <name>.json)
        #[arg(long)]
        command: Option<String>,
        /// Replace an existing registry
        #[arg(long)]
        force: bool,
    },

    /// Register zones of piecewise constancy on a property
    AddZpc {
        registry: PathBuf,
        /// Parameter set name
        name: String,
        /// Property the zones apply to
        #[arg(long)]
        field: String,
        /// Grid file holding the zone of each cell
        #[arg(long)]
        izone: PathBuf,
        /// Layers (all when omitted)
        #[arg(long = "layer")]
        layers: Vec<usize>,
        /// Initial value of every zone (current values when omitted)
        #[arg(long, allow_negative_numbers = true)]
        value: Option<f64>,
        /// Short parameter names <name>_<L>_<Z>
        #[arg(long)]
        lite: bool,
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Register one pumping multiplier per pumped cell
    AddPump {
        registry: PathBuf,
        name: String,
        #[arg(long = "layer")]
        layers: Vec<usize>,
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Register soil property values per zone
    AddSoil {
        registry: PathBuf,
        /// Parameter set name (no '_')
        name: String,
        /// Soil properties (all when omitted)
        #[arg(long = "prop")]
        properties: Vec<String>,
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Register the observations of one location
    AddObs {
        registry: PathBuf,
        /// Observed values file (date value)
        obsfile: PathBuf,
        /// Location name (default: file stem)
        #[arg(long)]
        locnme: Option<String>,
        #[arg(long)]
        weight: Option<f64>,
        /// Transformation of observed and simulated values
        #[arg(long, default_value = "none")]
        trans: Transform,
    },

    /// Write parameter, template, instruction and control files
    Write { registry: PathBuf },

    /// List registered parameters and observations
    Show { registry: PathBuf },
}
