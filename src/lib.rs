// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # songplay-lake
//!
//! Builds a star schema of song plays from two raw record collections that
//! share no key: track metadata and user activity logs.
//!
//! ## Features
//!
//! - **Song Extractor**: track metadata → `songs`, `artists`
//! - **Event Extractor**: `NextSong` events → `users`, `time`, play events
//! - **Songplay Reconciler**: fuzzy join on title, artist name and duration
//!   → `songplays`, left-outer
//! - **Partitioned Parquet**: Hive-style directories on S3, R2 or local disk
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use songplay_lake::config::{load_config, TransformConfig};
//! use songplay_lake::engine::transform;
//! use songplay_lake::template::TemplateContext;
//!
//! #[tokio::main]
//! async fn main() -> songplay_lake::Result<()> {
//!     // Pure core: raw records in, five tables out
//!     let (tables, stats) = transform(&tracks, &events, &TransformConfig::default())?;
//!
//!     // Or the full run against object stores
//!     let config = load_config("pipeline.yaml", &TemplateContext::new())?;
//!     let stats = songplay_lake::engine::run_pipeline(&config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!                 tracks    ┌────────────────┐  songs, artists
//!              ┌──────────► │ Song Extractor │ ──────┬──────────────────┐
//! ┌──────────┐ │            └────────────────┘       ▼                  ▼
//! │  Record  │─┤                               ┌────────────┐     ┌──────────┐
//! │  Source  │ │            ┌─────────────────┐│ Reconciler │ ──► │  Record  │
//! └──────────┘ │  events    │ Event Extractor ││ (catalog)  │     │   Sink   │
//!              └──────────► │                 │└────────────┘     │ Parquet  │
//!                           └─────────────────┘      ▲ songplays  └──────────┘
//!                             │ play events ─────────┘                  ▲
//!                             │ users, time ────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Template interpolation
pub mod template;

/// Pipeline configuration
pub mod config;

/// Object body decoders (JSON, JSONL)
pub mod decode;

/// Raw record field access and shape checks
pub mod record;

/// Table rows and schemas
pub mod model;

/// Song and event extraction
pub mod extract;

/// Songplay reconciliation
pub mod reconcile;

/// Hive-style partitioning
pub mod partition;

/// Arrow/Parquet output
pub mod output;

/// Record sources and sinks
pub mod storage;

/// Pipeline orchestration
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, PipelineConfig};
pub use engine::{run_pipeline, transform, Pipeline, RunStats, TableSet};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
