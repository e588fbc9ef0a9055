//! # rmarthe
//!
//! Facade over the workspace crates, used by the end-to-end test suite and
//! by programs that want one dependency:
//!
//! - `rmarthe_core` - model, fields, series, settings and ports
//! - `rmarthe_format` - MARTHE file formats (`MartheFilesPort` implementation)
//! - `rmarthe_pest` - PEST++ case registry, file writers and forward run
//! - `rmarthe_runtime` - executable resolution and the process runner
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use rmarthe::{MartheFileParser, MartheModel};
//!
//! let model = MartheModel::load(Path::new("mona.rma"), Arc::new(MartheFileParser::new()))?;
//! println!("{} layer(s)", model.nlay());
//! # Ok::<(), rmarthe::ModelError>(())
//! ```

// =============================================================================
// Workspace Crate Re-exports
// =============================================================================

// Model and field types
pub use rmarthe_core::{
    CellRecord, MartheField, MartheFieldSeries, MartheModel, ModelError, ObservedSeries,
    Selection, Settings, SimulatedSeries, Statistic, TimeSeriesTable, Transform, WorkDirs,
    ZonalStatsRequest, zonal_stats,
};

// Ports
pub use rmarthe_core::{MartheFilesPort, ProcessRunner, RunOutcome, RunRequest};

// Port implementations
pub use rmarthe_format::MartheFileParser;
pub use rmarthe_runtime::{ExecutableSpec, ExternalRunner, resolve_executable};

// PEST++ coupling
pub use rmarthe_pest::{
    ForwardReport, ForwardRun, ObservationSet, OptimRegistry, ParameterOptions, ParameterSet,
    PestError, PumpRequest, SoilRequest, ZpcRequest, pest_request, pump_set, read_izone,
    soil_set, zpc_set,
};

/// Re-export of rmarthe-core for types not listed above.
pub mod core_types {
    pub use rmarthe_core::*;
}

/// Re-export of rmarthe-pest file helpers (parameter, template, instruction
/// and simulated-value files).
pub mod pest {
    pub use rmarthe_pest::*;
}
