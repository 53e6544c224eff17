//! Pipeline configuration
//!
//! This module contains the configuration structures for a pipeline run,
//! loaded from YAML. Placeholders are rendered through [`crate::template`]
//! before parsing, so credentials can be pulled from a caller-supplied
//! environment snapshot without the library touching the environment.

use crate::decode::DecoderFormat;
use crate::error::{Error, Result};
use crate::extract::CalendarPolicy;
use crate::reconcile::MatchPolicy;
use crate::storage::Selector;
use crate::template::{self, TemplateContext};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Where the raw records come from
    #[serde(default)]
    pub input: InputConfig,

    /// Where the tables go
    #[serde(default)]
    pub output: OutputConfig,

    /// Object store credentials, shared by input and output
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Transformation knobs
    #[serde(default)]
    pub transform: TransformConfig,
}

impl PipelineConfig {
    /// Create a config for the given input and output locations with defaults elsewhere
    pub fn for_locations(input_url: impl Into<String>, output_url: impl Into<String>) -> Self {
        Self {
            input: InputConfig {
                url: input_url.into(),
                ..Default::default()
            },
            output: OutputConfig {
                url: output_url.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

// ============================================================================
// Input
// ============================================================================

/// Input location and record selectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Base URL (s3://, r2://, file:// or a local path)
    #[serde(default)]
    pub url: String,

    /// Selector for track metadata records
    #[serde(default = "default_song_selector")]
    pub songs: Selector,

    /// Selector for activity event records
    #[serde(default = "default_event_selector")]
    pub events: Selector,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            songs: default_song_selector(),
            events: default_event_selector(),
        }
    }
}

fn default_song_selector() -> Selector {
    Selector::new("song_data", "**/*.json", DecoderFormat::Jsonl)
}

fn default_event_selector() -> Selector {
    Selector::new("log_data", "**/*.json", DecoderFormat::Jsonl)
}

// ============================================================================
// Output
// ============================================================================

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    None,
}

/// Output location and file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base URL (s3://, r2://, file:// or a local path)
    #[serde(default)]
    pub url: String,

    /// Compression codec for Parquet files
    #[serde(default)]
    pub compression: CompressionCodec,

    /// Maximum rows per row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,

    /// Dictionary-encode columns
    #[serde(default = "default_true")]
    pub dictionary: bool,

    /// Write column statistics
    #[serde(default = "default_true")]
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            compression: CompressionCodec::default(),
            row_group_size: default_row_group_size(),
            dictionary: true,
            statistics: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_row_group_size() -> usize {
    1024 * 1024
}

// ============================================================================
// Credentials
// ============================================================================

/// Explicit object store credentials
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key id
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Secret access key
    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Session token for temporary credentials
    #[serde(default)]
    pub session_token: Option<String>,

    /// Bucket region
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Allow plain HTTP endpoints (local emulators)
    #[serde(default)]
    pub allow_http: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("allow_http", &self.allow_http)
            .finish()
    }
}

// ============================================================================
// Transform
// ============================================================================

/// Transformation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Exclusive bound on |event length - catalog duration|, in seconds
    #[serde(default = "default_tolerance")]
    pub match_tolerance_secs: f64,

    /// Offset from UTC used to turn epoch millis into wall-clock start times
    #[serde(default)]
    pub utc_offset_secs: i32,

    /// Shard songplay reconciliation across threads
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            match_tolerance_secs: default_tolerance(),
            utc_offset_secs: 0,
            parallel: default_parallel(),
        }
    }
}

fn default_tolerance() -> f64 {
    4.0
}

fn default_parallel() -> bool {
    true
}

impl TransformConfig {
    /// Matching policy for the reconciler
    pub fn match_policy(&self) -> MatchPolicy {
        MatchPolicy::new(self.match_tolerance_secs)
    }

    /// Calendar policy for timestamp derivation
    pub fn calendar_policy(&self) -> Result<CalendarPolicy> {
        CalendarPolicy::with_offset_secs(self.utc_offset_secs)
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a pipeline configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>, ctx: &TemplateContext) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_config_from_str(&content, ctx)
}

/// Load a pipeline configuration from a YAML string
pub fn load_config_from_str(yaml: &str, ctx: &TemplateContext) -> Result<PipelineConfig> {
    let rendered = template::render(yaml, ctx)?;
    let config: PipelineConfig = serde_yaml::from_str(&rendered)?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate a pipeline configuration
pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    if config.input.url.trim().is_empty() {
        return Err(Error::missing_field("input.url"));
    }

    if config.output.url.trim().is_empty() {
        return Err(Error::missing_field("output.url"));
    }

    validate_selector("input.songs", &config.input.songs)?;
    validate_selector("input.events", &config.input.events)?;

    if config.output.row_group_size == 0 {
        return Err(Error::invalid_value(
            "output.row_group_size",
            "must be greater than zero",
        ));
    }

    let tolerance = config.transform.match_tolerance_secs;
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(Error::invalid_value(
            "transform.match_tolerance_secs",
            format!("must be a positive number, got {tolerance}"),
        ));
    }

    config.transform.calendar_policy().map_err(|e| {
        Error::invalid_value("transform.utc_offset_secs", e.to_string())
    })?;

    if let Some(creds) = &config.credentials {
        if creds.access_key_id.is_some() != creds.secret_access_key.is_some() {
            return Err(Error::invalid_value(
                "credentials",
                "access_key_id and secret_access_key must be set together",
            ));
        }
    }

    Ok(())
}

/// Validate a record selector
fn validate_selector(field: &str, selector: &Selector) -> Result<()> {
    if selector.prefix.trim().is_empty() {
        return Err(Error::invalid_value(
            format!("{field}.prefix"),
            "cannot be empty",
        ));
    }

    glob::Pattern::new(&selector.pattern).map_err(|e| {
        Error::invalid_value(format!("{field}.pattern"), e.to_string())
    })?;

    if selector.record_path.is_some() && selector.format != DecoderFormat::Json {
        return Err(Error::invalid_value(
            format!("{field}.record_path"),
            "only applies to format: json",
        ));
    }

    Ok(())
}
