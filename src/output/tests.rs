//! Tests for output module

use super::*;
use crate::config::{CompressionCodec, OutputConfig};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use parquet::basic::Compression;
use serde_json::json;
use std::sync::Arc;

fn play_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("user_id", DataType::Utf8, false),
        Field::new("song_id", DataType::Utf8, true),
        Field::new("length", DataType::Float64, true),
        Field::new("hour", DataType::Int32, true),
        Field::new("paid", DataType::Boolean, true),
        Field::new(
            "start_time",
            DataType::Timestamp(TimeUnit::Millisecond, None),
            true,
        ),
    ]))
}

// ============================================================================
// JSON to Arrow Tests
// ============================================================================

#[test]
fn test_json_to_arrow_simple() {
    let records = vec![
        json!({"id": 1, "user_id": "7", "song_id": "S1", "length": 295.5, "hour": 10, "paid": true,
               "start_time": "2023-01-01T10:00:00"}),
        json!({"id": 2, "user_id": "8", "song_id": null, "length": 300.0, "hour": 11, "paid": false,
               "start_time": "2023-01-01T11:00:00.250"}),
    ];

    let batch = json_to_arrow(&records, &play_schema()).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 7);
    assert_eq!(batch.column(2).null_count(), 1);
}

#[test]
fn test_json_to_arrow_empty() {
    let batch = json_to_arrow(&[], &play_schema()).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 7);
}

#[test]
fn test_json_to_arrow_missing_nullable_fields() {
    let records = vec![json!({"id": 1, "user_id": "7"})];

    let batch = json_to_arrow(&records, &play_schema()).unwrap();
    assert_eq!(batch.num_rows(), 1);
    assert_eq!(batch.column(3).null_count(), 1);
    assert_eq!(batch.column(6).null_count(), 1);
}

#[test]
fn test_json_to_arrow_null_in_required_column() {
    let records = vec![json!({"id": 1, "user_id": null})];
    let result = json_to_arrow(&records, &play_schema());
    assert!(result.is_err());
}

#[test]
fn test_json_to_arrow_ignores_extra_fields() {
    let records = vec![json!({"id": 1, "user_id": "7", "extra": "ignored"})];
    let batch = json_to_arrow(&records, &play_schema()).unwrap();
    assert_eq!(batch.num_columns(), 7);
}

#[test]
fn test_json_to_arrow_bad_timestamp() {
    let records = vec![json!({"id": 1, "user_id": "7", "start_time": "yesterday"})];
    let err = json_to_arrow(&records, &play_schema()).unwrap_err();
    assert!(err.to_string().contains("start_time"));
}

#[test]
fn test_json_to_arrow_timestamp_from_millis() {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "t",
        DataType::Timestamp(TimeUnit::Millisecond, None),
        false,
    )]));
    let batch = json_to_arrow(&[json!({"t": 1_672_567_200_000_i64})], &schema).unwrap();
    let rows = arrow_to_json(&batch).unwrap();
    assert_eq!(rows[0]["t"], "2023-01-01T10:00:00");
}

#[test]
fn test_json_to_arrow_unsupported_type() {
    let schema = Arc::new(Schema::new(vec![Field::new("d", DataType::Date32, true)]));
    assert!(json_to_arrow(&[json!({"d": 1})], &schema).is_err());
}

// ============================================================================
// Arrow to JSON Tests
// ============================================================================

#[test]
fn test_arrow_to_json_roundtrip() {
    let original = vec![json!({
        "id": 123,
        "user_id": "39",
        "song_id": null,
        "length": 98.5,
        "hour": 23,
        "paid": true,
        "start_time": "2018-11-15T00:30:26.796"
    })];

    let batch = json_to_arrow(&original, &play_schema()).unwrap();
    let result = arrow_to_json(&batch).unwrap();

    assert_eq!(result, original);
}

#[test]
fn test_arrow_to_json_empty() {
    let batch = json_to_arrow(&[], &play_schema()).unwrap();
    assert!(arrow_to_json(&batch).unwrap().is_empty());
}

// ============================================================================
// Parquet Writer Config Tests
// ============================================================================

#[test]
fn test_parquet_writer_config_default() {
    let config = ParquetWriterConfig::default();
    assert!(config.is_dictionary_enabled());
    assert!(config.is_statistics_enabled());
    assert_eq!(config.compression(), Compression::SNAPPY);
}

#[test]
fn test_parquet_writer_config_builder() {
    let config = ParquetWriterConfig::new()
        .with_row_group_size(1000)
        .with_dictionary(false)
        .with_statistics(false)
        .uncompressed();

    assert!(!config.is_dictionary_enabled());
    assert!(!config.is_statistics_enabled());
    assert_eq!(config.row_group_size(), 1000);
    assert_eq!(config.compression(), Compression::UNCOMPRESSED);
}

#[test]
fn test_parquet_writer_config_from_output() {
    let output = OutputConfig {
        url: "./lake".to_string(),
        compression: CompressionCodec::Zstd,
        row_group_size: 500,
        dictionary: false,
        statistics: true,
    };
    let config = ParquetWriterConfig::from_output(&output);
    assert!(matches!(config.compression(), Compression::ZSTD(_)));
    assert_eq!(config.row_group_size(), 500);
    assert!(!config.is_dictionary_enabled());
    assert!(config.is_statistics_enabled());

    let output = OutputConfig {
        compression: CompressionCodec::None,
        ..output
    };
    assert_eq!(
        ParquetWriterConfig::from_output(&output).compression(),
        Compression::UNCOMPRESSED
    );
}

// ============================================================================
// Parquet Encoding Tests
// ============================================================================

#[test]
fn test_encode_decode_parquet() {
    let records = vec![
        json!({"id": 1, "user_id": "7", "song_id": "S1", "start_time": "2023-01-01T10:00:00"}),
        json!({"id": 2, "user_id": "8"}),
    ];
    let batch = json_to_arrow(&records, &play_schema()).unwrap();

    let bytes = encode_parquet(&batch, &ParquetWriterConfig::default()).unwrap();
    assert_eq!(&bytes[..4], b"PAR1");

    let batches = decode_parquet(bytes).unwrap();
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total, 2);

    let rows = arrow_to_json(&batches[0]).unwrap();
    assert_eq!(rows[0]["song_id"], "S1");
    assert_eq!(rows[0]["start_time"], "2023-01-01T10:00:00");
    assert!(rows[1]["song_id"].is_null());
}

#[test]
fn test_encode_with_each_codec() {
    let batch = json_to_arrow(&[json!({"id": 1, "user_id": "7"})], &play_schema()).unwrap();

    for config in [
        ParquetWriterConfig::new().uncompressed(),
        ParquetWriterConfig::new().zstd(),
        ParquetWriterConfig::new().gzip(),
    ] {
        let bytes = encode_parquet(&batch, &config).unwrap();
        assert_eq!(decode_parquet(bytes).unwrap()[0].num_rows(), 1);
    }
}

#[test]
fn test_parquet_writer_rows_written() {
    let batch = json_to_arrow(
        &[json!({"id": 1, "user_id": "a"}), json!({"id": 2, "user_id": "b"})],
        &play_schema(),
    )
    .unwrap();

    let config = ParquetWriterConfig::default();
    let mut writer = ParquetWriter::in_memory(batch.schema().as_ref(), &config).unwrap();
    assert_eq!(writer.rows_written(), 0);

    writer.write(&batch).unwrap();
    writer.write(&batch).unwrap();
    assert_eq!(writer.rows_written(), 4);

    let (buffer, rows) = writer.finish().unwrap();
    assert_eq!(rows, 4);
    assert!(!buffer.is_empty());
}

#[test]
fn test_decode_parquet_garbage() {
    assert!(decode_parquet(bytes::Bytes::from_static(b"not parquet")).is_err());
}
