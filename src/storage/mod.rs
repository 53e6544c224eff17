//! Storage module
//!
//! Supports: S3, R2 (S3-compatible), local filesystem, in-memory
//!
//! # Overview
//!
//! The transform never touches storage itself. This module provides the
//! collaborators it is handed:
//! - `RecordSource` - reads raw records matching a `Selector`
//! - `RecordSink` - persists a finished `Table`
//! - `StoreLocation` - a store opened with explicit credentials

mod location;
mod sink;
mod source;
mod types;

pub use location::StoreLocation;
pub use sink::{MemorySink, ParquetSink, PART_FILE, STAGING_DIR};
pub use source::{MemorySource, ObjectStoreSource};
pub use types::{RecordSink, RecordSource, Selector};
