//! Common types used throughout songplay-lake
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Table Names
// ============================================================================

/// The five tables of the star schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    /// Song dimension
    Songs,
    /// Artist dimension
    Artists,
    /// User dimension
    Users,
    /// Time dimension
    Time,
    /// Songplay fact table
    Songplays,
}

impl TableName {
    /// All tables, in the order the pipeline writes them
    pub const ALL: [TableName; 5] = [
        TableName::Songs,
        TableName::Artists,
        TableName::Users,
        TableName::Time,
        TableName::Songplays,
    ];

    /// Storage name of the table
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Songs => "songs",
            TableName::Artists => "artists",
            TableName::Users => "users",
            TableName::Time => "time",
            TableName::Songplays => "songplays",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Subscription Level
// ============================================================================

/// Subscription level of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Free,
    Paid,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Free => "free",
            Level::Paid => "paid",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Level::Free),
            "paid" => Ok(Level::Paid),
            other => Err(format!("unknown level '{other}'")),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
