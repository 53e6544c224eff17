//! Extraction outputs and counters

use crate::model::{Artist, PlayEvent, Song, TimeRow, User};
use crate::types::TableName;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters collected by one extraction stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    /// Raw records handed to the stage
    pub records: usize,
    /// Records that passed the stage filter (`NextSong` for events)
    pub accepted: usize,
    /// Records skipped because they were not of the expected kind
    pub rejected: usize,
    /// Rows dropped per table because of a malformed record
    pub dropped: BTreeMap<TableName, usize>,
    /// Valid rows discarded because their key was already taken
    pub duplicates: usize,
}

impl ExtractReport {
    pub fn new(records: usize) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Count one dropped row for a table
    pub fn drop_row(&mut self, table: TableName) {
        *self.dropped.entry(table).or_insert(0) += 1;
    }

    /// Rows dropped from a table
    pub fn dropped(&self, table: TableName) -> usize {
        self.dropped.get(&table).copied().unwrap_or(0)
    }

    /// Rows dropped across all tables
    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }
}

/// Output of the Song Extractor
#[derive(Debug, Clone, Default)]
pub struct SongTables {
    pub songs: Vec<Song>,
    pub artists: Vec<Artist>,
    pub report: ExtractReport,
}

/// Output of the Event Extractor
#[derive(Debug, Clone, Default)]
pub struct EventTables {
    pub users: Vec<User>,
    /// One row per distinct `start_time`, ascending
    pub time: Vec<TimeRow>,
    /// Every `NextSong` event in source order, complete or not
    pub play_events: Vec<PlayEvent>,
    pub report: ExtractReport,
}
