//! Error types for songplay-lake
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-record problems (`MalformedRecord`) are recoverable: the extractors
//! log them, count them and drop the record. Everything else aborts the
//! batch and is surfaced to the caller.

use thiserror::Error;

/// The main error type for songplay-lake
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Malformed record, field '{field}': {message}")]
    MalformedRecord { field: String, message: String },

    #[error("Schema mismatch in {source_name} records: {message}")]
    SchemaMismatch {
        source_name: String,
        message: String,
    },

    #[error("Failed to decode records: {message}")]
    Decode { message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Failed to persist table '{table}': {message}")]
    Sink { table: String, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Create a malformed record error
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sink {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Check if this error only affects a single record
    ///
    /// Record-level errors drop the offending record; every other error
    /// aborts the batch.
    pub fn is_record_level(&self) -> bool {
        matches!(self, Error::MalformedRecord { .. })
    }

    /// Check if this error must abort the batch
    pub fn is_fatal(&self) -> bool {
        !self.is_record_level()
    }
}

/// Result type alias for songplay-lake
pub type Result<T> = std::result::Result<T, Error>;
