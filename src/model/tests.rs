//! Tests for model module

use super::*;
use crate::output::arrow_to_json;
use crate::types::{Level, TableName};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn ts(h: u32, m: u32, s: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 11, 15)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn song() -> Song {
    Song {
        song_id: "S1".to_string(),
        title: Some("Fix You".to_string()),
        artist_id: "A1".to_string(),
        year: Some(2005),
        duration: 294.0,
    }
}

fn songplay(id: i64, song_id: Option<&str>) -> Songplay {
    Songplay {
        songplay_id: id,
        start_time: ts(0, 30, 26),
        user_id: "7".to_string(),
        level: Some(Level::Paid),
        song_id: song_id.map(String::from),
        artist_id: song_id.map(|_| "A1".to_string()),
        session_id: Some(583),
        location: Some("San Jose-Sunnyvale-Santa Clara, CA".to_string()),
        user_agent: None,
        year: 2018,
        month: 11,
    }
}

/// Column names of a serialized row, in schema order
fn keys(row: &Value) -> Vec<String> {
    let mut keys: Vec<String> = row.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

fn schema_columns(table: TableName) -> Vec<String> {
    let mut cols: Vec<String> = table_schema(table)
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    cols.sort();
    cols
}

// ============================================================================
// Schema / Row Agreement Tests
// ============================================================================

#[test]
fn test_row_fields_match_schemas() {
    let artist = Artist {
        artist_id: "A1".to_string(),
        name: Some("Coldplay".to_string()),
        location: None,
        latitude: None,
        longitude: None,
    };
    let user = User {
        user_id: "7".to_string(),
        first_name: Some("Adelyn".to_string()),
        last_name: Some("Jordan".to_string()),
        gender: Some("F".to_string()),
        level: Level::Free,
    };
    let time = TimeRow {
        start_time: ts(0, 30, 26),
        hour: 0,
        day: 15,
        week: 46,
        month: 11,
        year: 2018,
        weekday: 5,
    };

    let cases = [
        (TableName::Songs, serde_json::to_value(song()).unwrap()),
        (TableName::Artists, serde_json::to_value(artist).unwrap()),
        (TableName::Users, serde_json::to_value(user).unwrap()),
        (TableName::Time, serde_json::to_value(time).unwrap()),
        (
            TableName::Songplays,
            serde_json::to_value(songplay(1, None)).unwrap(),
        ),
    ];

    for (table, row) in cases {
        assert_eq!(keys(&row), schema_columns(table), "table {table}");
    }
}

#[test]
fn test_partition_columns_exist_in_schemas() {
    for table in TableName::ALL {
        let schema = table_schema(table);
        for col in crate::partition::PartitionSpec::for_table(table).columns() {
            assert!(schema.field_with_name(col).is_ok(), "{table}.{col}");
        }
    }
}

// ============================================================================
// Table Tests
// ============================================================================

#[test]
fn test_table_from_rows() {
    let table = Table::from_rows(TableName::Songs, &[song()]).unwrap();

    assert_eq!(table.name(), TableName::Songs);
    assert_eq!(table.num_rows(), 1);
    assert!(!table.is_empty());
    assert_eq!(table.partition_spec().columns(), ["year", "artist_id"]);
    assert_eq!(
        table.rows()[0],
        json!({"song_id": "S1", "title": "Fix You", "artist_id": "A1", "year": 2005, "duration": 294.0})
    );
}

#[test]
fn test_table_to_batch_roundtrip() {
    let rows = vec![songplay(1, Some("S1")), songplay(2, None)];
    let table = Table::from_rows(TableName::Songplays, &rows).unwrap();

    let batch = table.to_batch().unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.schema(), *table.schema());

    let back = arrow_to_json(&batch).unwrap();
    assert_eq!(back[0]["start_time"], "2018-11-15T00:30:26");
    assert_eq!(back[0]["level"], "paid");
    assert_eq!(back[0]["song_id"], "S1");
    assert!(back[1]["song_id"].is_null());
    assert!(back[1]["artist_id"].is_null());
}

#[test]
fn test_table_partitions() {
    let mut october = songplay(3, None);
    october.month = 10;
    let rows = vec![songplay(1, None), october, songplay(2, None)];
    let table = Table::from_rows(TableName::Songplays, &rows).unwrap();

    let partitions = table.partitions();
    assert_eq!(partitions.len(), 2);
    assert_eq!(partitions[0].key.path(), "year=2018/month=10");
    assert_eq!(partitions[1].len(), 2);

    let batch = table.partition_batch(&partitions[1]).unwrap();
    assert_eq!(batch.num_rows(), 2);
}

#[test]
fn test_empty_table_batch() {
    let table = Table::from_rows::<User>(TableName::Users, &[]).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.to_batch().unwrap().num_rows(), 0);
}

#[test]
fn test_play_event_default_is_empty() {
    let event = PlayEvent::default();
    assert!(event.start_time.is_none());
    assert!(event.user_id.is_none());
}
