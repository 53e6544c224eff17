//! Song Extractor: track metadata to the `songs` and `artists` tables

use super::types::{ExtractReport, SongTables};
use crate::error::{Error, Result};
use crate::model::{Artist, Song};
use crate::record::{get_f64, get_i64, get_string, TRACK_SHAPE};
use crate::types::{JsonObject, TableName};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

/// Extract the song and artist dimensions from track metadata records
///
/// Both tables keep the first row seen per key. A record missing a required
/// field is dropped from the affected table only, so a track with a broken
/// duration can still contribute its artist. Unparsable coordinates are
/// nulled rather than dropping the artist. A batch with no track records in
/// it fails with `SchemaMismatch`.
pub fn extract_songs(records: &[Value]) -> Result<SongTables> {
    let checked = TRACK_SHAPE.check_all(records)?;
    let mut report = ExtractReport::new(records.len());
    report.accepted = checked.objects.len();
    report.rejected = checked.rejected;

    let mut songs = Vec::new();
    let mut artists = Vec::new();
    let mut song_ids = HashSet::new();
    let mut artist_ids = HashSet::new();

    for (index, record) in checked.objects {
        match song_row(record) {
            Ok(song) => {
                if song_ids.insert(song.song_id.clone()) {
                    songs.push(song);
                } else {
                    report.duplicates += 1;
                }
            }
            Err(e) => {
                debug!("Dropping song from track record {index}: {e}");
                report.drop_row(TableName::Songs);
            }
        }

        match artist_row(record) {
            Ok(artist) => {
                if artist_ids.insert(artist.artist_id.clone()) {
                    artists.push(artist);
                }
            }
            Err(e) => {
                debug!("Dropping artist from track record {index}: {e}");
                report.drop_row(TableName::Artists);
            }
        }
    }

    info!(
        "Extracted {} songs and {} artists from {} track records ({} dropped)",
        songs.len(),
        artists.len(),
        report.records,
        report.total_dropped()
    );

    Ok(SongTables {
        songs,
        artists,
        report,
    })
}

fn song_row(record: &JsonObject) -> Result<Song> {
    let song_id =
        get_string(record, &["song_id"]).ok_or_else(|| Error::malformed("song_id", "missing"))?;
    let artist_id = get_string(record, &["artist_id"])
        .ok_or_else(|| Error::malformed("artist_id", "missing"))?;

    let duration = match get_f64(record, &["duration"])? {
        Some(d) if d > 0.0 => d,
        Some(d) => return Err(Error::malformed("duration", format!("must be > 0, got {d}"))),
        None => return Err(Error::malformed("duration", "missing")),
    };

    let year = get_i64(record, &["year"])?
        .map(|y| {
            i32::try_from(y).map_err(|_| Error::malformed("year", format!("{y} is out of range")))
        })
        .transpose()?;

    Ok(Song {
        song_id,
        title: get_string(record, &["title"]),
        artist_id,
        year,
        duration,
    })
}

fn artist_row(record: &JsonObject) -> Result<Artist> {
    let artist_id = get_string(record, &["artist_id"])
        .ok_or_else(|| Error::malformed("artist_id", "missing"))?;

    Ok(Artist {
        artist_id,
        name: get_string(record, &["artist_name"]),
        location: get_string(record, &["artist_location"]),
        latitude: coordinate(record, "artist_latitude"),
        longitude: coordinate(record, "artist_longitude"),
    })
}

fn coordinate(record: &JsonObject, name: &str) -> Option<f64> {
    get_f64(record, &[name]).unwrap_or_else(|e| {
        debug!("Nulling {name}: {e}");
        None
    })
}
