#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    CellRecord, DEFAULT_MASKED_VALUES, FieldError, GridBlockSpan, GridGeometry, MartheField,
    MartheGrid, MarthePump, MartheSoil, ModelLayout, ObservedSeries, PastpContent, PumpRecord,
    STATIC_ISTEP, Selection, SimulatedSeries, SoilRecord, Transform, TransformError, ZonalStat,
    Statistic, ZonalStatsRequest, is_masked, zonal_stats,
};
pub use ports::{
    CoreError, GridWriteOptions, MartheFilesError, MartheFilesPort, NoopProgress, ProcessError,
    ProcessRunner, ProgressReporter, RunOutcome, RunRequest,
};
pub use services::{
    FieldCheck, MartheFieldSeries, MartheModel, ModelError, TimeSeriesRow, TimeSeriesTable,
};
pub use settings::{Settings, SettingsError, SettingsUpdate, validate_settings};

pub use paths::{PathError, WorkDirs, ensure_directory};

// Silence unused dev-dependency warnings for suites that only use some of them
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio as _;
