//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format of a raw input object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// A single JSON document (object or array of objects)
    Json,
    /// JSON Lines format (one JSON object per line)
    #[default]
    Jsonl,
}

/// Records decoded from one object body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeOutcome {
    /// Successfully parsed records
    pub records: Vec<Value>,
    /// Lines that could not be parsed and were skipped
    pub skipped: usize,
}

impl DecodeOutcome {
    /// Create an outcome with no skipped lines
    pub fn complete(records: Vec<Value>) -> Self {
        Self {
            records,
            skipped: 0,
        }
    }
}

/// Trait for decoding object bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the body into a list of records
    fn decode(&self, body: &str) -> Result<DecodeOutcome>;
}
