//! Event Extractor: activity log to `users`, `time` and the play events

use super::calendar::CalendarPolicy;
use super::types::{EventTables, ExtractReport};
use crate::error::{Error, Result};
use crate::model::{PlayEvent, User};
use crate::record::{get_f64, get_i64, get_string, ACTIVITY_SHAPE};
use crate::types::{JsonObject, Level, TableName};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Page value marking an actual song playback
pub const PLAY_PAGE: &str = "NextSong";

const USER_ID: &[&str] = &["userId", "user_id"];
const FIRST_NAME: &[&str] = &["firstName", "first_name"];
const LAST_NAME: &[&str] = &["lastName", "last_name"];
const SESSION_ID: &[&str] = &["sessionId", "session_id"];
const USER_AGENT: &[&str] = &["userAgent", "user_agent"];

/// Extract the user and time dimensions plus the play events from activity records
///
/// Only `NextSong` events contribute. Users keep the attributes of their
/// latest event by `ts`; on equal timestamps the later record wins. Every
/// play event is passed on, even an incomplete one, so the reconciler can
/// account for what it excludes.
pub fn extract_events(records: &[Value], calendar: &CalendarPolicy) -> Result<EventTables> {
    let checked = ACTIVITY_SHAPE.check_all(records)?;
    let mut report = ExtractReport::new(records.len());
    report.rejected = checked.rejected;

    let mut users = LatestUsers::default();
    let mut start_times = BTreeSet::new();
    let mut play_events = Vec::new();

    for (index, record) in checked.objects {
        if get_string(record, &["page"]).as_deref() != Some(PLAY_PAGE) {
            continue;
        }
        report.accepted += 1;

        let ts = match get_i64(record, &["ts"]) {
            Ok(ts) => ts,
            Err(e) => {
                debug!("Activity record {index}: {e}");
                None
            }
        };
        let start_time = match ts.map(|ms| calendar.start_time(ms)).transpose() {
            Ok(start_time) => start_time,
            Err(e) => {
                debug!("Activity record {index}: {e}");
                None
            }
        };

        match start_time {
            Some(t) => {
                start_times.insert(t);
            }
            None => {
                debug!("Dropping time row for activity record {index}: no valid ts");
                report.drop_row(TableName::Time);
            }
        }

        match user_row(record) {
            Ok(user) => {
                if !users.offer(ts, user) {
                    report.duplicates += 1;
                }
            }
            Err(e) => {
                debug!("Dropping user from activity record {index}: {e}");
                report.drop_row(TableName::Users);
            }
        }

        play_events.push(play_event(index, record, start_time));
    }

    let users = users.into_rows();
    let time: Vec<_> = start_times
        .into_iter()
        .map(|t| calendar.time_row(t))
        .collect();

    info!(
        "Extracted {} play events, {} users and {} time rows from {} activity records",
        play_events.len(),
        users.len(),
        time.len(),
        report.records
    );

    Ok(EventTables {
        users,
        time,
        play_events,
        report,
    })
}

fn user_row(record: &JsonObject) -> Result<User> {
    let user_id = get_string(record, USER_ID).ok_or_else(|| Error::malformed("userId", "missing"))?;
    let level = get_string(record, &["level"])
        .ok_or_else(|| Error::malformed("level", "missing"))?
        .parse::<Level>()
        .map_err(|e| Error::malformed("level", e))?;

    Ok(User {
        user_id,
        first_name: get_string(record, FIRST_NAME),
        last_name: get_string(record, LAST_NAME),
        gender: get_string(record, &["gender"]),
        level,
    })
}

/// Build a play event, leaving unusable fields empty
fn play_event(index: usize, record: &JsonObject, start_time: Option<NaiveDateTime>) -> PlayEvent {
    let length = get_f64(record, &["length"]).unwrap_or_else(|e| {
        debug!("Activity record {index}: {e}");
        None
    });
    let session_id = get_i64(record, SESSION_ID).unwrap_or_else(|e| {
        debug!("Activity record {index}: {e}");
        None
    });

    PlayEvent {
        start_time,
        user_id: get_string(record, USER_ID),
        level: get_string(record, &["level"]).and_then(|l| l.parse().ok()),
        song_title: get_string(record, &["song"]),
        artist_name: get_string(record, &["artist"]),
        length,
        session_id,
        location: get_string(record, &["location"]),
        user_agent: get_string(record, USER_AGENT),
    }
}

/// Latest-wins user table that remembers first-appearance order
#[derive(Default)]
struct LatestUsers {
    index: HashMap<String, usize>,
    rows: Vec<(Option<i64>, User)>,
}

impl LatestUsers {
    /// Offer a user seen at `ts`; returns false when the key already existed
    fn offer(&mut self, ts: Option<i64>, user: User) -> bool {
        match self.index.get(&user.user_id) {
            Some(&slot) => {
                let current = &mut self.rows[slot];
                if ts >= current.0 {
                    *current = (ts, user);
                }
                false
            }
            None => {
                self.index.insert(user.user_id.clone(), self.rows.len());
                self.rows.push((ts, user));
                true
            }
        }
    }

    fn into_rows(self) -> Vec<User> {
        self.rows.into_iter().map(|(_, user)| user).collect()
    }
}
