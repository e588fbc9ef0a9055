//! Core domain types.
//!
//! These types represent the MARTHE model as data, independent of any
//! file layout or process concerns.
//!
//! # Structure
//!
//! - `grid` - One (layer, nested grid) block: geometry and values
//! - `field` - Gridded property held as cell records
//! - `stats` - Zonal statistics over polygons
//! - `layout` - Files making up a MARTHE project
//! - `pump` / `soil` - Schedule tables read from the `.pastp` file
//! - `obs` - Observed and simulated time series
//! - `transform` - Value transformations used for calibration

mod field;
mod grid;
mod layout;
mod obs;
mod pump;
mod soil;
mod stats;
mod transform;

pub use field::{DEFAULT_MASKED_VALUES, FieldError, MartheField, Selection, is_masked};
pub use grid::{CellRecord, GridBlockSpan, GridGeometry, MartheGrid, STATIC_ISTEP};
pub use layout::ModelLayout;
pub use obs::{ObservedSeries, SimulatedSeries};
pub use pump::{MarthePump, PumpRecord};
pub use soil::{MartheSoil, SoilRecord};
pub use stats::{Statistic, ZonalStat, ZonalStatsRequest, point_in_polygon, zonal_stats};
pub use transform::{Transform, TransformError};

/// Content of a `.pastp` schedule file.
///
/// Lines are kept verbatim so that writing back only touches the values
/// referenced by records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PastpContent {
    /// Raw file lines, without line terminators.
    pub lines: Vec<String>,
    /// `dates[0]` is the simulation start, `dates[n]` the end of step `n`.
    pub dates: Vec<chrono::NaiveDate>,
    /// Pumping records in file order.
    pub pumping: Vec<PumpRecord>,
    /// Soil property records in file order.
    pub soil: Vec<SoilRecord>,
}
