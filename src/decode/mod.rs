//! Record decoder module
//!
//! Supports: JSON, JSONL
//!
//! # Overview
//!
//! Raw input objects are either a single JSON document (one track per file,
//! or an array of tracks) or JSON Lines (one activity event per line).
//! Each decoder turns an object body into a list of raw records.

mod decoders;
mod types;

pub use decoders::{decoder_for, JsonDecoder, JsonlDecoder};
pub use types::{DecodeOutcome, DecoderFormat, RecordDecoder};
