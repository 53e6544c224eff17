//! Arrow schemas of the output tables
//!
//! These schemas are the contract for anything reading the lake. Column
//! order follows the row structs; partition columns stay in the data.

use crate::types::TableName;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use std::sync::Arc;

/// Arrow schema of a table
pub fn table_schema(table: TableName) -> SchemaRef {
    match table {
        TableName::Songs => songs_schema(),
        TableName::Artists => artists_schema(),
        TableName::Users => users_schema(),
        TableName::Time => time_schema(),
        TableName::Songplays => songplays_schema(),
    }
}

fn timestamp() -> DataType {
    DataType::Timestamp(TimeUnit::Millisecond, None)
}

fn songs_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("song_id", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("year", DataType::Int32, true),
        Field::new("duration", DataType::Float64, false),
    ]))
}

fn artists_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
    ]))
}

fn users_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("user_id", DataType::Utf8, false),
        Field::new("first_name", DataType::Utf8, true),
        Field::new("last_name", DataType::Utf8, true),
        Field::new("gender", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, false),
    ]))
}

fn time_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("start_time", timestamp(), false),
        Field::new("hour", DataType::Int32, false),
        Field::new("day", DataType::Int32, false),
        Field::new("week", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
        Field::new("year", DataType::Int32, false),
        Field::new("weekday", DataType::Int32, false),
    ]))
}

fn songplays_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("songplay_id", DataType::Int64, false),
        Field::new("start_time", timestamp(), false),
        Field::new("user_id", DataType::Utf8, false),
        Field::new("level", DataType::Utf8, true),
        Field::new("song_id", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("session_id", DataType::Int64, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("user_agent", DataType::Utf8, true),
        Field::new("year", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
    ]))
}
