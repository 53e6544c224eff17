//! Engine types
//!
//! The five finished tables and the statistics of a run.

use crate::model::Table;
use crate::types::TableName;
use serde::Serialize;
use std::collections::BTreeMap;

/// The star schema produced by one transform
#[derive(Debug, Clone)]
pub struct TableSet {
    pub songs: Table,
    pub artists: Table,
    pub users: Table,
    pub time: Table,
    pub songplays: Table,
}

impl TableSet {
    /// All five tables, in write order
    pub fn tables(&self) -> [&Table; 5] {
        [
            &self.songs,
            &self.artists,
            &self.users,
            &self.time,
            &self.songplays,
        ]
    }

    /// A table by name
    pub fn get(&self, name: TableName) -> &Table {
        match name {
            TableName::Songs => &self.songs,
            TableName::Artists => &self.artists,
            TableName::Users => &self.users,
            TableName::Time => &self.time,
            TableName::Songplays => &self.songplays,
        }
    }
}

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Raw track metadata records read
    pub track_records: usize,
    /// Raw activity records read
    pub event_records: usize,
    /// Activity records that were `NextSong` events
    pub play_events: usize,
    /// Raw records of either input skipped as not of the expected kind
    pub rejected_records: usize,
    /// Rows per output table
    pub rows: BTreeMap<TableName, usize>,
    /// Malformed records dropped per table
    pub dropped: BTreeMap<TableName, usize>,
    /// Songplays resolved to a catalog song
    pub matched: usize,
    /// Songplays left with null song and artist
    pub unresolved: usize,
    /// Files handed to the sink
    pub files_written: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in a table
    pub fn rows(&self, table: TableName) -> usize {
        self.rows.get(&table).copied().unwrap_or(0)
    }

    /// Rows dropped from a table
    pub fn dropped(&self, table: TableName) -> usize {
        self.dropped.get(&table).copied().unwrap_or(0)
    }

    /// Add dropped-row counts
    pub fn add_dropped(&mut self, counts: &BTreeMap<TableName, usize>) {
        for (table, count) in counts {
            *self.dropped.entry(*table).or_insert(0) += count;
        }
    }

    /// Add written files
    pub fn add_files(&mut self, count: usize) {
        self.files_written += count;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
