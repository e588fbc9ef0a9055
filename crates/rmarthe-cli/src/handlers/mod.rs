#![doc = include_str!("README.md")]

//! Handlers follow the same pattern:
//! - Signature: `pub fn execute(ctx: &CliContext, ...) -> Result<()>`
//!   (`async` when an external program runs)
//! - Rendering lives in small pure functions so that it can be tested
//!   without capturing stdout

pub mod check_exe;
pub mod field;
pub mod forward_run;
pub mod info;
pub mod optim;
pub mod run_pest;
pub mod series;
