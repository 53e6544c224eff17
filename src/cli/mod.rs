//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `run` - Read both record collections, build and write the star schema
//! - `validate` - Load and validate a pipeline configuration
//! - `tables` - Describe the output tables

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
