//! Execution engine module
//!
//! Pipeline orchestration: read → transform → write.
//!
//! # Overview
//!
//! The engine module provides:
//! - `transform` - the pure core, raw records in, five tables out
//! - `Pipeline` - reads both collections from a `RecordSource`, transforms
//!   them and hands each table to a `RecordSink`
//! - `run_pipeline` - the same, wired to object stores from a `PipelineConfig`

mod types;

pub use types::{RunStats, TableSet};

use crate::config::{PipelineConfig, TransformConfig};
use crate::error::Result;
use crate::extract::{extract_events, extract_songs};
use crate::model::Table;
use crate::output::ParquetWriterConfig;
use crate::reconcile::{reconcile_with, Catalog};
use crate::storage::{ObjectStoreSource, ParquetSink, RecordSink, RecordSource, Selector, StoreLocation};
use crate::types::TableName;
use serde_json::Value;
use std::time::Instant;
use tracing::info;

/// Build the five tables from raw track and activity records
///
/// Fails only on batch-fatal errors (records of the wrong kind, an invalid
/// calendar offset). Malformed records are dropped and counted in the
/// returned stats.
pub fn transform(
    tracks: &[Value],
    events: &[Value],
    config: &TransformConfig,
) -> Result<(TableSet, RunStats)> {
    let calendar = config.calendar_policy()?;
    let policy = config.match_policy();

    // The two extractors share nothing
    let (songs, activity) = if config.parallel {
        rayon::join(|| extract_songs(tracks), || extract_events(events, &calendar))
    } else {
        (extract_songs(tracks), extract_events(events, &calendar))
    };
    let songs = songs?;
    let activity = activity?;

    let catalog = Catalog::build(&songs.songs, &songs.artists);
    let plays = reconcile_with(&activity.play_events, &catalog, &policy, config.parallel);

    let tables = TableSet {
        songs: Table::from_rows(TableName::Songs, &songs.songs)?,
        artists: Table::from_rows(TableName::Artists, &songs.artists)?,
        users: Table::from_rows(TableName::Users, &activity.users)?,
        time: Table::from_rows(TableName::Time, &activity.time)?,
        songplays: Table::from_rows(TableName::Songplays, &plays.songplays)?,
    };

    let mut stats = RunStats::new();
    stats.track_records = songs.report.records;
    stats.event_records = activity.report.records;
    stats.play_events = activity.report.accepted;
    stats.rejected_records = songs.report.rejected + activity.report.rejected;
    stats.add_dropped(&songs.report.dropped);
    stats.add_dropped(&activity.report.dropped);
    if plays.report.excluded > 0 {
        stats
            .dropped
            .insert(TableName::Songplays, plays.report.excluded);
    }
    stats.matched = plays.report.matched;
    stats.unresolved = plays.report.unresolved;
    for table in tables.tables() {
        stats.rows.insert(table.name(), table.num_rows());
    }

    Ok((tables, stats))
}

/// Reads, transforms and writes one full run
#[derive(Debug, Clone)]
pub struct Pipeline {
    songs: Selector,
    events: Selector,
    transform: TransformConfig,
}

impl Pipeline {
    /// Create a pipeline from its selectors and transform settings
    pub fn new(songs: Selector, events: Selector, transform: TransformConfig) -> Self {
        Self {
            songs,
            events,
            transform,
        }
    }

    /// Create a pipeline from a loaded configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.input.songs.clone(),
            config.input.events.clone(),
            config.transform.clone(),
        )
    }

    /// Run the pipeline
    ///
    /// Every table is built before the first one is written. Tables are
    /// written in the order songs, artists, users, time, songplays; a sink
    /// failure stops the run and is returned unchanged.
    pub async fn run(&self, source: &dyn RecordSource, sink: &dyn RecordSink) -> Result<RunStats> {
        let start = Instant::now();

        let (tracks, events) =
            tokio::try_join!(source.read(&self.songs), source.read(&self.events))?;
        info!(
            "Read {} track records and {} activity records",
            tracks.len(),
            events.len()
        );

        let (tables, mut stats) = transform(&tracks, &events, &self.transform)?;

        for table in tables.tables() {
            let written = sink.write_table(table).await?;
            stats.add_files(written.len());
        }

        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Pipeline finished in {}ms: {} songplays ({} matched, {} unresolved), {} files",
            stats.duration_ms,
            stats.rows(TableName::Songplays),
            stats.matched,
            stats.unresolved,
            stats.files_written
        );
        Ok(stats)
    }
}

/// Run a configured pipeline against its object store locations
pub async fn run_pipeline(config: &PipelineConfig) -> Result<RunStats> {
    let credentials = config.credentials.as_ref();
    let input = StoreLocation::parse(&config.input.url, credentials)?;
    let output = StoreLocation::parse_output(&config.output.url, credentials)?;

    let source = ObjectStoreSource::new(input);
    let sink = ParquetSink::new(output, ParquetWriterConfig::from_output(&config.output));

    Pipeline::from_config(config).run(&source, &sink).await
}
