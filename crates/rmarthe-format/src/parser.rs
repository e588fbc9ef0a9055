//! MARTHE file parser implementation.
//!
//! This module provides the `MartheFileParser` struct that implements
//! the `MartheFilesPort` trait from `rmarthe-core`.

use std::path::Path;

use rmarthe_core::{
    GridBlockSpan, GridWriteOptions, MartheFilesError, MartheFilesPort, MartheGrid, ModelLayout,
    ObservedSeries, PastpContent, SimulatedSeries,
};
use tracing::debug;

use crate::error::FormatResult;
use crate::reader::{read_latin1, write_latin1};
use crate::{grid, obsfile, pastp, prn, rma};

/// MARTHE file parser.
///
/// Stateless; every call reads or writes the file it is given.
#[derive(Debug, Clone, Default)]
pub struct MartheFileParser;

impl MartheFileParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Read a file and parse it, attaching the path to any error.
    #[allow(clippy::unused_self)]
    fn parse_with<T>(
        &self,
        path: &Path,
        parse: impl FnOnce(&str) -> FormatResult<T>,
    ) -> Result<T, MartheFilesError> {
        let text = read_latin1(path)?;
        parse(&text).map_err(|e| e.in_file(path).into())
    }
}

impl MartheFilesPort for MartheFileParser {
    fn read_rma(&self, path: &Path) -> Result<ModelLayout, MartheFilesError> {
        let layout = self.parse_with(path, |text| Ok(rma::parse_rma(path, text)))?;
        debug!(rma = %path.display(), files = layout.files.len(), "Read project file");
        Ok(layout)
    }

    fn read_grids(&self, path: &Path) -> Result<Vec<MartheGrid>, MartheFilesError> {
        let grids = self.parse_with(path, grid::parse_grids)?;
        debug!(path = %path.display(), blocks = grids.len(), "Read grid file");
        Ok(grids)
    }

    fn index_grids(&self, path: &Path) -> Result<Vec<GridBlockSpan>, MartheFilesError> {
        let spans = self.parse_with(path, grid::index_grids)?;
        debug!(path = %path.display(), blocks = spans.len(), "Indexed grid file");
        Ok(spans)
    }

    fn read_grid_blocks(
        &self,
        path: &Path,
        spans: &[GridBlockSpan],
    ) -> Result<Vec<MartheGrid>, MartheFilesError> {
        self.parse_with(path, |text| grid::parse_spans(text, spans))
    }

    fn write_grids(
        &self,
        path: &Path,
        grids: &[MartheGrid],
        options: &GridWriteOptions,
    ) -> Result<(), MartheFilesError> {
        let text = grid::format_grids(grids, options);
        write_latin1(path, &text)?;
        debug!(path = %path.display(), blocks = grids.len(), "Wrote grid file");
        Ok(())
    }

    fn read_pastp(&self, path: &Path) -> Result<PastpContent, MartheFilesError> {
        self.parse_with(path, pastp::parse_pastp)
    }

    fn write_pastp(&self, path: &Path, content: &PastpContent) -> Result<(), MartheFilesError> {
        let text = pastp::format_pastp(content).map_err(|e| e.in_file(path))?;
        write_latin1(path, &text)?;
        debug!(
            path = %path.display(),
            pumping = content.pumping.len(),
            soil = content.soil.len(),
            "Wrote schedule"
        );
        Ok(())
    }

    fn read_prn(&self, path: &Path) -> Result<SimulatedSeries, MartheFilesError> {
        self.parse_with(path, prn::parse_prn)
    }

    fn read_obs(
        &self,
        path: &Path,
        locnme: Option<&str>,
    ) -> Result<ObservedSeries, MartheFilesError> {
        let name = locnme.map_or_else(|| obsfile::default_locnme(path), str::to_string);
        self.parse_with(path, |text| obsfile::parse_obs(text, &name))
    }
}
