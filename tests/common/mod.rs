//! Common test utilities.
//!
//! Model fixtures written to a temp directory, a mocked MARTHE that derives
//! heads from the permeability file, and the few PEST++ file operations the
//! tests need to stand in for PEST++.

pub mod fixtures;
pub mod marthe;
pub mod pestpp;
