//! Services orchestrating domain types through ports.

mod model;
mod series;

#[cfg(test)]
pub(crate) mod testing;

pub use model::{MartheModel, ModelError};
pub use series::{FieldCheck, MartheFieldSeries, TimeSeriesRow, TimeSeriesTable};
