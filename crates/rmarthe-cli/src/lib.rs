#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

// Used by handler tests only
use chrono as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod field_commands;
pub mod handlers;
pub mod optim_commands;
pub mod parser;
pub mod presentation;
pub mod progress;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, bootstrap_with};
pub use commands::Commands;
pub use error::{CliError, exit_code};
pub use field_commands::FieldCommand;
pub use optim_commands::OptimCommand;
pub use parser::Cli;
pub use progress::CliProgress;
