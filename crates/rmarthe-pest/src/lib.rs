#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod control;
mod error;
pub mod forward;
pub mod instruction;
pub mod names;
pub mod observations;
pub mod params;
pub mod parfile;
pub mod registry;
pub mod simfile;
pub mod template;
mod text;

pub use control::{ControlFile, pest_request};
pub use error::{PestError, PestResult};
pub use forward::{ForwardReport, ForwardRun, apply_parameters, simulated_values};
pub use names::{ParsedName, parse_name};
pub use observations::{Observation, ObservationSet};
pub use params::{
    Parameter, ParameterKind, ParameterOptions, ParameterSet, PumpRequest, SoilRequest, Target,
    ZpcRequest, pump_set, read_izone, soil_set, zpc_set,
};
pub use registry::OptimRegistry;

// Silence unused dev-dependency warnings for suites that only use some of them
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use ndarray as _;
#[cfg(test)]
use rmarthe_format as _;
#[cfg(test)]
use tokio as _;
