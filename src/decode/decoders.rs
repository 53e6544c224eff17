//! Decoder implementations
//!
//! Each decoder handles a specific input format.

use super::types::{DecodeOutcome, DecoderFormat, RecordDecoder};
use crate::error::{Error, Result};
use serde_json::Value;
use tracing::warn;

/// Build the decoder for a format
///
/// Unless `strict` is set, JSON Lines input is decoded leniently: an
/// unparsable line is a malformed record and is skipped rather than failing
/// the whole object. `record_path` only applies to JSON documents.
pub fn decoder_for(
    format: DecoderFormat,
    record_path: Option<&str>,
    strict: bool,
) -> Box<dyn RecordDecoder> {
    match (format, record_path) {
        (DecoderFormat::Json, Some(path)) => Box::new(JsonDecoder::with_path(path)),
        (DecoderFormat::Json, None) => Box::new(JsonDecoder::new()),
        (DecoderFormat::Jsonl, _) if strict => Box::new(JsonlDecoder::new()),
        (DecoderFormat::Jsonl, _) => Box::new(JsonlDecoder::lenient()),
    }
}

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot-separated path to the records
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Extract records from a JSON value using the path
    fn extract_records(&self, value: Value) -> Vec<Value> {
        let target = match &self.record_path {
            Some(path) => match extract_simple_path(&value, path) {
                Some(v) => v.clone(),
                None => return Vec::new(),
            },
            None => value,
        };

        match target {
            Value::Array(arr) => arr,
            Value::Null => Vec::new(),
            other => vec![other],
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<DecodeOutcome> {
        if body.trim().is_empty() {
            return Ok(DecodeOutcome::default());
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;
        Ok(DecodeOutcome::complete(self.extract_records(value)))
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one JSON object per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder {
    /// Skip unparsable lines instead of failing
    skip_invalid: bool,
}

impl JsonlDecoder {
    /// Create a strict JSONL decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder that skips unparsable lines
    pub fn lenient() -> Self {
        Self { skip_invalid: true }
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<DecodeOutcome> {
        let mut outcome = DecodeOutcome::default();

        for (line_num, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(line) {
                Ok(value) => outcome.records.push(value),
                Err(e) if self.skip_invalid => {
                    warn!(line = line_num + 1, error = %e, "Skipping unparsable JSONL line");
                    outcome.skipped += 1;
                }
                Err(e) => {
                    return Err(Error::decode(format!(
                        "Failed to parse JSONL at line {}: {e}",
                        line_num + 1
                    )));
                }
            }
        }

        Ok(outcome)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extract a value using simple dot-notation path
fn extract_simple_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = match current {
            Value::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
            _ => current.get(part)?,
        };
    }

    Some(current)
}
