//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet encoding.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Converting table rows (as JSON) to Arrow RecordBatches against a fixed schema
//! - Converting RecordBatches back to JSON rows
//! - Encoding and decoding Parquet files in memory

mod schema;
mod writer;

pub use schema::{arrow_to_json, json_to_arrow};
pub use writer::{decode_parquet, encode_parquet, ParquetWriter, ParquetWriterConfig};

#[cfg(test)]
mod tests;
