#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

mod command;
mod error;
mod resolve;
mod runner;
mod validate;

pub use command::{build_command, spawn_log_readers};
pub use error::ExecutableError;
pub use resolve::{ExecutableSpec, resolve_executable, resolve_with_env};
pub use runner::ExternalRunner;
pub use validate::validate_executable;
