//! Record source and sink contracts

use crate::decode::{decoder_for, DecoderFormat, RecordDecoder};
use crate::error::Result;
use crate::model::Table;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which objects of a source make up one logical record collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    /// Key prefix under the source root (e.g. `song_data`)
    pub prefix: String,

    /// Glob matched against keys relative to the prefix
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// How each object body is decoded
    #[serde(default)]
    pub format: DecoderFormat,

    /// Dot-separated path to the records inside a JSON document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_path: Option<String>,

    /// Fail on an unparsable JSON Lines line instead of skipping it
    #[serde(default)]
    pub strict: bool,
}

fn default_pattern() -> String {
    "**/*.json".to_string()
}

impl Selector {
    pub fn new(prefix: impl Into<String>, pattern: impl Into<String>, format: DecoderFormat) -> Self {
        Self {
            prefix: prefix.into(),
            pattern: pattern.into(),
            format,
            record_path: None,
            strict: false,
        }
    }

    /// Read records from a path inside each JSON document
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Fail on unparsable lines
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Decoder for the selected objects
    pub fn decoder(&self) -> Box<dyn RecordDecoder> {
        decoder_for(self.format, self.record_path.as_deref(), self.strict)
    }
}

/// Supplies raw records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Read every record matching the selector, in a deterministic order
    async fn read(&self, selector: &Selector) -> Result<Vec<Value>>;
}

/// Persists finished tables
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persist one table, returning the locations written
    ///
    /// Either the whole table is handed to storage or nothing is. Failures
    /// surface as `Error::Sink` and are not retried.
    async fn write_table(&self, table: &Table) -> Result<Vec<String>>;
}
