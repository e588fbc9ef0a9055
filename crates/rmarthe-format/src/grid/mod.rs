//! MARTHE grid files.
//!
//! A grid file is a sequence of blocks, each holding one (layer, nested
//! grid) array of one field at one step. Blocks come in two forms:
//! explicit `[Data]` with every value, and light `[Constant_Data]` for
//! uniform grids.

mod parser;
mod writer;

pub use parser::{index_grids, parse_grids, parse_spans};
pub use writer::format_grids;
