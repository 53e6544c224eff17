//! Table row types

use crate::types::Level;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A row of the `songs` dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub song_id: String,
    pub title: Option<String>,
    pub artist_id: String,
    /// Release year; the track catalog uses 0 for unknown
    pub year: Option<i32>,
    /// Track length in seconds, always > 0
    pub duration: f64,
}

/// A row of the `artists` dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub artist_id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A row of the `users` dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    /// Level carried by the user's latest play event
    pub level: Level,
}

/// A row of the `time` dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRow {
    pub start_time: NaiveDateTime,
    pub hour: i32,
    pub day: i32,
    /// ISO-8601 week number
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// 1 = Sunday ... 7 = Saturday
    pub weekday: i32,
}

/// A filtered `NextSong` event, ready to be reconciled against the catalog
///
/// Not persisted. Every field is optional so events built by other callers
/// go through the same malformed-record exclusion as extracted ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayEvent {
    pub start_time: Option<NaiveDateTime>,
    pub user_id: Option<String>,
    pub level: Option<Level>,
    pub song_title: Option<String>,
    pub artist_name: Option<String>,
    /// Played length in seconds
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// A row of the `songplays` fact table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Songplay {
    pub songplay_id: i64,
    pub start_time: NaiveDateTime,
    pub user_id: String,
    pub level: Option<Level>,
    /// Null when no catalog song matched
    pub song_id: Option<String>,
    /// Null when no catalog song matched
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub year: i32,
    pub month: i32,
}
