//! MARTHE file format port definition.
//!
//! This port abstracts reading and writing MARTHE native text files so that
//! services only handle domain types.
//!
//! # Design
//!
//! - Domain types (`MartheGrid`, `PastpContent`, ...) are defined in `domain`
//! - This port only defines the trait and error type
//! - Implementations live in the `rmarthe-format` crate

use std::path::Path;

use thiserror::Error;

use crate::domain::{
    GridBlockSpan, MartheGrid, ModelLayout, ObservedSeries, PastpContent, SimulatedSeries,
};

/// Errors that can occur while reading or writing MARTHE files.
///
/// Implementations may have richer internal errors that convert to this
/// type via `From`.
#[derive(Debug, Error)]
pub enum MartheFilesError {
    #[error("File not found: {0}")]
    NotFound(String),

    /// The file content does not follow the expected format.
    #[error("Invalid format in {path}: {message}")]
    InvalidFormat { path: String, message: String },

    #[error("IO error: {0}")]
    Io(String),
}

/// Options controlling grid file output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridWriteOptions {
    /// Written as `Max_Layer`.
    pub maxlayer: usize,
    /// Written as `Max_NestG`.
    pub maxnest: usize,
    /// Write uniform grids in the light `[Constant_Data]` form.
    pub keep_uniform_fmt: bool,
}

/// Port for MARTHE file formats.
pub trait MartheFilesPort: Send + Sync {
    /// Read the project layout from a `.rma` file.
    fn read_rma(&self, path: &Path) -> Result<ModelLayout, MartheFilesError>;

    /// Parse every grid block of a file.
    fn read_grids(&self, path: &Path) -> Result<Vec<MartheGrid>, MartheFilesError>;

    /// Locate grid blocks without parsing their values.
    fn index_grids(&self, path: &Path) -> Result<Vec<GridBlockSpan>, MartheFilesError>;

    /// Parse only the listed blocks, in the given order.
    fn read_grid_blocks(
        &self,
        path: &Path,
        spans: &[GridBlockSpan],
    ) -> Result<Vec<MartheGrid>, MartheFilesError>;

    fn write_grids(
        &self,
        path: &Path,
        grids: &[MartheGrid],
        options: &GridWriteOptions,
    ) -> Result<(), MartheFilesError>;

    fn read_pastp(&self, path: &Path) -> Result<PastpContent, MartheFilesError>;

    /// Write a schedule back, updating the values of its records.
    fn write_pastp(&self, path: &Path, content: &PastpContent) -> Result<(), MartheFilesError>;

    /// Read simulated series from `historiq.prn`.
    fn read_prn(&self, path: &Path) -> Result<SimulatedSeries, MartheFilesError>;

    /// Read an observed series, named after the file stem unless `locnme` is given.
    fn read_obs(
        &self,
        path: &Path,
        locnme: Option<&str>,
    ) -> Result<ObservedSeries, MartheFilesError>;
}
