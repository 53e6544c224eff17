//! Integration tests for the full pipeline
//!
//! Tests the end-to-end flow: raw JSON files on disk → transform →
//! Hive-partitioned Parquet on disk, read back through the Parquet reader.

use serde_json::{json, Value};
use songplay_lake::config::{load_config_from_str, PipelineConfig};
use songplay_lake::engine::run_pipeline;
use songplay_lake::output::{arrow_to_json, decode_parquet};
use songplay_lake::template::TemplateContext;
use songplay_lake::types::TableName;
use songplay_lake::Error;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 2023-01-01T10:00:00Z
const TS: i64 = 1_672_567_200_000;

// ============================================================================
// Fixtures
// ============================================================================

fn write_json(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn track_file(dir: &Path, name: &str, record: &Value) {
    write_json(
        &dir.join("song_data").join("A").join("B").join(format!("{name}.json")),
        &record.to_string(),
    );
}

/// Raw input laid out like the public sample bucket
fn input_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    track_file(
        root,
        "TRAAAAA",
        &json!({"num_songs": 1, "artist_id": "A1", "artist_latitude": null,
                "artist_longitude": null, "artist_location": "London", "artist_name": "Coldplay",
                "song_id": "S1", "title": "Fix You", "duration": 294.0, "year": 2005}),
    );
    track_file(
        root,
        "TRAAAAB",
        &json!({"num_songs": 1, "artist_id": "A2", "artist_latitude": 40.7,
                "artist_longitude": -74.0, "artist_location": "New York", "artist_name": "The Strokes",
                "song_id": "S2", "title": "Reptilia", "duration": 219.5, "year": 2003}),
    );
    track_file(
        root,
        "TRAAAAC",
        &json!({"num_songs": 1, "artist_id": "A2", "artist_latitude": 40.7,
                "artist_longitude": -74.0, "artist_location": "New York", "artist_name": "The Strokes",
                "song_id": "S3", "title": "Demo", "duration": 100.0, "year": 0}),
    );
    // Duplicate of S1 in a later file
    track_file(
        root,
        "TRAAAAD",
        &json!({"num_songs": 1, "artist_id": "A1", "artist_name": "Coldplay",
                "song_id": "S1", "title": "Fix You (Live)", "duration": 320.0, "year": 2006}),
    );

    let events = [
        json!({"page": "Home", "userId": "7", "level": "free", "ts": TS - 5_000, "sessionId": 1}),
        json!({"page": "NextSong", "song": "Fix You", "artist": "Coldplay", "length": 295.5,
               "userId": "7", "firstName": "Adelyn", "lastName": "Jordan", "gender": "F",
               "level": "free", "sessionId": 1, "location": "Chicago", "userAgent": "UA-1", "ts": TS}),
        json!({"page": "NextSong", "song": "Fix You", "artist": "Coldplay", "length": 300.0,
               "userId": "7", "firstName": "Adelyn", "lastName": "Jordan", "gender": "F",
               "level": "paid", "sessionId": 1, "location": "Chicago", "userAgent": "UA-1",
               "ts": TS + 300_000}),
    ];
    let december = [
        json!({"page": "NextSong", "song": "Reptilia", "artist": "The Strokes", "length": 221.0,
               "userId": "15", "firstName": "Lily", "lastName": "Koch", "gender": "F",
               "level": "paid", "sessionId": 9, "location": "Boston", "userAgent": "UA-2",
               "ts": TS - 86_400_000}),
        json!({"page": "NextSong", "song": null, "artist": null, "length": null,
               "userId": "", "level": "paid", "sessionId": 10, "ts": TS - 86_300_000}),
    ];
    let lines = |records: &[Value]| {
        records
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    };
    write_json(
        &root.join("log_data").join("2023").join("01").join("2023-01-01-events.json"),
        &lines(&events),
    );
    write_json(
        &root.join("log_data").join("2022").join("12").join("2022-12-31-events.json"),
        &lines(&december),
    );

    dir
}

fn config_for(input: &Path, output: &Path) -> PipelineConfig {
    PipelineConfig::for_locations(input.to_str().unwrap(), output.to_str().unwrap())
}

/// Every file under `root`, keyed by its path relative to `root`
fn files(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap();
                let key = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                out.insert(key, fs::read(&path).unwrap());
            }
        }
    }

    let mut out = BTreeMap::new();
    if root.exists() {
        walk(root, root, &mut out);
    }
    out
}

/// Rows of every data file of a table, keyed by partition directory
fn read_table(output: &Path, table: TableName) -> BTreeMap<String, Vec<Value>> {
    files(&output.join(table.as_str()))
        .into_iter()
        .map(|(key, data)| {
            let partition = key
                .rsplit_once('/')
                .map_or(String::new(), |(dir, _)| dir.to_string());
            let rows = decode_parquet(data.into())
                .unwrap()
                .iter()
                .flat_map(|batch| arrow_to_json(batch).unwrap())
                .collect();
            (partition, rows)
        })
        .collect()
}

fn all_rows(output: &Path, table: TableName) -> Vec<Value> {
    read_table(output, table).into_values().flatten().collect()
}

/// `col=value` pairs of a partition directory
fn partition_values(partition: &str) -> Vec<(String, String)> {
    partition
        .split('/')
        .map(|segment| {
            let (col, value) = segment.split_once('=').unwrap();
            (col.to_string(), value.to_string())
        })
        .collect()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "__HIVE_DEFAULT_PARTITION__".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// End-to-End Tests
// ============================================================================

#[tokio::test]
async fn test_pipeline_writes_star_schema() {
    let input = input_dir();
    let output = tempfile::tempdir().unwrap();

    let stats = run_pipeline(&config_for(input.path(), output.path()))
        .await
        .unwrap();

    assert_eq!(stats.track_records, 4);
    assert_eq!(stats.event_records, 5);
    assert_eq!(stats.play_events, 4);
    assert_eq!(stats.rows(TableName::Songs), 3);
    assert_eq!(stats.rows(TableName::Artists), 2);
    assert_eq!(stats.rows(TableName::Users), 2);
    assert_eq!(stats.rows(TableName::Time), 4);
    assert_eq!(stats.rows(TableName::Songplays), 3);
    assert_eq!(stats.matched, 2);
    assert_eq!(stats.unresolved, 1);
    assert_eq!(stats.dropped(TableName::Songplays), 1);

    let written = files(output.path());
    assert!(written.contains_key("songs/year=2005/artist_id=A1/part-00000.parquet"));
    assert!(written.contains_key("songs/year=0/artist_id=A2/part-00000.parquet"));
    assert!(written.contains_key("artists/part-00000.parquet"));
    assert!(written.contains_key("users/part-00000.parquet"));
    assert!(written.contains_key("time/year=2022/month=12/part-00000.parquet"));
    assert!(written.contains_key("songplays/year=2023/month=1/part-00000.parquet"));
    assert_eq!(written.len(), stats.files_written);
}

#[tokio::test]
async fn test_pipeline_songplay_scenarios() {
    let input = input_dir();
    let output = tempfile::tempdir().unwrap();
    run_pipeline(&config_for(input.path(), output.path()))
        .await
        .unwrap();

    let mut plays = all_rows(output.path(), TableName::Songplays);
    plays.sort_by_key(|row| row["songplay_id"].as_i64().unwrap());

    // Sources are read in key order: 2022/12 before 2023/01
    let ids: Vec<i64> = plays.iter().map(|r| r["songplay_id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [1, 2, 3]);

    assert_eq!(plays[0]["song_id"], "S2");
    assert_eq!(plays[0]["artist_id"], "A2");

    // 295.5 against 294.0
    assert_eq!(plays[1]["song_id"], "S1");
    assert_eq!(plays[1]["artist_id"], "A1");
    assert_eq!(plays[1]["start_time"], "2023-01-01T10:00:00");
    assert_eq!(plays[1]["user_id"], "7");
    assert_eq!(plays[1]["level"], "free");
    assert_eq!(plays[1]["session_id"], 1);

    // 300.0 is 6 seconds off
    assert!(plays[2]["song_id"].is_null());
    assert!(plays[2]["artist_id"].is_null());
    assert_eq!(plays[2]["level"], "paid");
}

#[tokio::test]
async fn test_pipeline_dimension_policies() {
    let input = input_dir();
    let output = tempfile::tempdir().unwrap();
    run_pipeline(&config_for(input.path(), output.path()))
        .await
        .unwrap();

    // First-seen song wins
    let songs = all_rows(output.path(), TableName::Songs);
    let s1: Vec<&Value> = songs.iter().filter(|r| r["song_id"] == "S1").collect();
    assert_eq!(s1.len(), 1);
    assert_eq!(s1[0]["title"], "Fix You");

    // Latest level wins
    let users = all_rows(output.path(), TableName::Users);
    let adelyn = users.iter().find(|r| r["user_id"] == "7").unwrap();
    assert_eq!(adelyn["level"], "paid");
    assert_eq!(adelyn["first_name"], "Adelyn");

    // Only NextSong timestamps, one row each
    let time = all_rows(output.path(), TableName::Time);
    let sunday = time
        .iter()
        .find(|r| r["start_time"] == "2023-01-01T10:00:00")
        .unwrap();
    assert_eq!(sunday["hour"], 10);
    assert_eq!(sunday["week"], 52);
    assert_eq!(sunday["weekday"], 1);
    assert!(time.iter().all(|r| r["start_time"] != "2023-01-01T09:59:55"));
}

#[tokio::test]
async fn test_pipeline_partition_consistency() {
    let input = input_dir();
    let output = tempfile::tempdir().unwrap();
    run_pipeline(&config_for(input.path(), output.path()))
        .await
        .unwrap();

    for table in [TableName::Songs, TableName::Time, TableName::Songplays] {
        let partitions = read_table(output.path(), table);
        assert!(!partitions.is_empty());

        for (partition, rows) in partitions {
            let expected = partition_values(&partition);
            for row in rows {
                for (col, value) in &expected {
                    assert_eq!(&value_text(&row[col]), value, "{table} {partition}");
                }
            }
        }
    }
}

#[tokio::test]
async fn test_pipeline_is_idempotent() {
    let input = input_dir();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    run_pipeline(&config_for(input.path(), first.path()))
        .await
        .unwrap();
    run_pipeline(&config_for(input.path(), second.path()))
        .await
        .unwrap();
    assert_eq!(files(first.path()), files(second.path()));

    // Rerunning into the same directory replaces the previous output
    let before = files(first.path());
    run_pipeline(&config_for(input.path(), first.path()))
        .await
        .unwrap();
    assert_eq!(files(first.path()), before);
}

#[tokio::test]
async fn test_pipeline_swapped_inputs_fail_before_writing() {
    let input = input_dir();
    let output = tempfile::tempdir().unwrap();

    let mut config = config_for(input.path(), output.path());
    std::mem::swap(&mut config.input.songs, &mut config.input.events);

    let err = run_pipeline(&config).await.unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }));
    assert!(files(output.path()).is_empty());
}

#[tokio::test]
async fn test_pipeline_from_templated_yaml() {
    let input = input_dir();
    let output = tempfile::tempdir().unwrap();
    let lake: PathBuf = output.path().join("lake");

    let mut ctx = TemplateContext::new();
    ctx.set_var("input", input.path().to_str().unwrap());
    ctx.set_var("output", lake.to_str().unwrap());

    let yaml = r#"
input:
  url: "{{ vars.input }}"
  songs: { prefix: song_data, pattern: "**/*.json", format: jsonl }
  events: { prefix: log_data, pattern: "2023/**/*.json", format: jsonl }
output:
  url: "{{ vars.output }}"
  compression: zstd
transform:
  match_tolerance_secs: 1.0
  parallel: false
"#;
    let config = load_config_from_str(yaml, &ctx).unwrap();
    let stats = run_pipeline(&config).await.unwrap();

    // Only the January file, and 295.5 is now out of tolerance
    assert_eq!(stats.event_records, 3);
    assert_eq!(stats.rows(TableName::Songplays), 2);
    assert_eq!(stats.matched, 0);
    assert!(lake.join("songplays").is_dir());
}

#[tokio::test]
async fn test_pipeline_missing_input_directory() {
    let output = tempfile::tempdir().unwrap();
    let config = config_for(&output.path().join("does-not-exist"), output.path());
    assert!(run_pipeline(&config).await.is_err());
}
