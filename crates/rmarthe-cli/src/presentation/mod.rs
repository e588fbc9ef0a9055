#![doc = include_str!("README.md")]

//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - Domain transforms belong in core services or the handlers

pub mod tables;

pub use tables::{format_optional, format_value, print_separator, render_table, truncate_string};
