//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Builds the songplay star schema from raw track metadata and activity logs
#[derive(Parser, Debug)]
#[command(name = "songplay-lake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Template variable for the config file (key=value, repeatable)
    #[arg(long = "var", global = true, value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline: read, transform, write all five tables
    Run {
        /// Override the input location (local path, s3://bucket/path, r2://bucket/path)
        #[arg(short, long)]
        input: Option<String>,

        /// Override the output location (local path, s3://bucket/path, r2://bucket/path)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate the pipeline configuration
    Validate,

    /// Show the schema and partition columns of each output table
    Tables,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
