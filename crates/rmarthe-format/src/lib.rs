#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

mod error;
mod format;
mod grid;
mod obsfile;
mod parser;
mod pastp;
mod prn;
mod reader;
mod rma;
mod validation;

// =============================================================================
// Public API: Parser + Core Re-exports (minimal surface)
// =============================================================================

/// The MARTHE file parser implementation.
pub use parser::MartheFileParser;

// Re-export domain types and port from core for convenience
pub use rmarthe_core::{GridWriteOptions, MartheFilesError, MartheFilesPort};

// Text-level entry points, for callers that already hold file content
pub use grid::{format_grids, index_grids, parse_grids};
pub use obsfile::parse_obs;
pub use pastp::{format_pastp, parse_pastp};
pub use prn::parse_prn;
pub use rma::parse_rma_entries;

pub use format::{format_number, parse_number};
pub use validation::{ValidationError, validate_grid_file};
