//! Songplay Reconciler

use super::catalog::Catalog;
use super::matcher::{resolve, MatchOutcome, MatchPolicy};
use crate::model::{Artist, PlayEvent, Song, Songplay};
use chrono::{Datelike, NaiveDateTime};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Counters collected by the reconciler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Songplays resolved to a catalog song
    pub matched: usize,
    /// Songplays written with null song and artist
    pub unresolved: usize,
    /// Events without a `start_time` or `user_id`
    pub excluded: usize,
}

/// The `songplays` table plus its counters
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutput {
    pub songplays: Vec<Songplay>,
    pub report: ReconcileReport,
}

/// A play event that carries the fields every songplay needs
struct ValidEvent<'a> {
    songplay_id: i64,
    start_time: NaiveDateTime,
    user_id: &'a str,
    event: &'a PlayEvent,
}

/// Join play events against the songs and artists tables
pub fn reconcile(
    events: &[PlayEvent],
    songs: &[Song],
    artists: &[Artist],
    policy: &MatchPolicy,
) -> ReconcileOutput {
    let catalog = Catalog::build(songs, artists);
    reconcile_with(events, &catalog, policy, false)
}

/// Join play events against a prebuilt catalog
///
/// Every valid event yields exactly one songplay, matched or not, in event
/// order. `songplay_id` is the 1-based position among valid events. With
/// `parallel` set, matching is sharded across the rayon pool; the catalog is
/// only read.
pub fn reconcile_with(
    events: &[PlayEvent],
    catalog: &Catalog,
    policy: &MatchPolicy,
    parallel: bool,
) -> ReconcileOutput {
    let mut report = ReconcileReport::default();
    let mut valid = Vec::with_capacity(events.len());

    for (index, event) in events.iter().enumerate() {
        let (Some(start_time), Some(user_id)) = (event.start_time, event.user_id.as_deref())
        else {
            debug!("Excluding play event {index}: missing start_time or user_id");
            report.excluded += 1;
            continue;
        };
        valid.push(ValidEvent {
            songplay_id: valid.len() as i64 + 1,
            start_time,
            user_id,
            event,
        });
    }

    let build = |v: &ValidEvent<'_>| songplay(v, resolve(v.event, catalog, policy));
    let songplays: Vec<Songplay> = if parallel {
        valid.par_iter().map(build).collect()
    } else {
        valid.iter().map(build).collect()
    };

    report.matched = songplays.iter().filter(|s| s.song_id.is_some()).count();
    report.unresolved = songplays.len() - report.matched;

    info!(
        "Reconciled {} songplays against {} catalog songs: {} matched, {} unresolved, {} excluded",
        songplays.len(),
        catalog.len(),
        report.matched,
        report.unresolved,
        report.excluded
    );

    ReconcileOutput { songplays, report }
}

fn songplay(valid: &ValidEvent<'_>, outcome: MatchOutcome<'_>) -> Songplay {
    let entry = outcome.entry();
    let event = valid.event;

    Songplay {
        songplay_id: valid.songplay_id,
        start_time: valid.start_time,
        user_id: valid.user_id.to_string(),
        level: event.level,
        song_id: entry.map(|e| e.song_id.clone()),
        artist_id: entry.map(|e| e.artist_id.clone()),
        session_id: event.session_id,
        location: event.location.clone(),
        user_agent: event.user_agent.clone(),
        year: valid.start_time.year(),
        month: valid.start_time.month() as i32,
    }
}
