//! JSON to Arrow conversion
//!
//! Table rows are serialized to JSON objects first and then laid out
//! column by column against the table's declared Arrow schema.

use crate::error::{Error, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int32Array, Int64Array, NullArray, StringArray,
    TimestampMillisecondArray,
};
use arrow::datatypes::{DataType, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;
use std::sync::Arc;

/// Convert JSON records to an Arrow RecordBatch with the given schema
///
/// Fields missing from a record become nulls; fields not in the schema are
/// ignored.
pub fn json_to_arrow(records: &[Value], schema: &SchemaRef) -> Result<RecordBatch> {
    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::clone(schema)));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let values: Vec<Option<&Value>> = records
            .iter()
            .map(|record| match record {
                Value::Object(obj) => obj.get(field.name()).filter(|v| !v.is_null()),
                _ => None,
            })
            .collect();

        let array = build_array(&values, field.data_type()).map_err(|e| Error::Output {
            message: format!("Column '{}': {e}", field.name()),
        })?;
        columns.push(array);
    }

    RecordBatch::try_new(Arc::clone(schema), columns).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),

        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int32 => {
            let arr: Int32Array = values
                .iter()
                .map(|v| {
                    v.and_then(Value::as_i64)
                        .and_then(|i| i32::try_from(i).ok())
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        Value::String(s) => s.clone(),
                        _ => v.to_string(),
                    })
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Timestamp(TimeUnit::Millisecond, None) => {
            let millis = values
                .iter()
                .map(|v| v.map(timestamp_millis).transpose())
                .collect::<Result<Vec<Option<i64>>>>()?;
            Ok(Arc::new(TimestampMillisecondArray::from(millis)))
        }

        other => Err(Error::output(format!("Unsupported column type {other}"))),
    }
}

/// Read a naive timestamp as epoch-style millis
///
/// Accepts the ISO text chrono serializes `NaiveDateTime` to, or a raw
/// integer millisecond count.
fn timestamp_millis(value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| Error::output(format!("Invalid timestamp millis: {n}"))),
        Value::String(s) => s
            .parse::<NaiveDateTime>()
            .map(|dt| dt.and_utc().timestamp_millis())
            .map_err(|e| Error::output(format!("Invalid timestamp '{s}': {e}"))),
        other => Err(Error::output(format!("Invalid timestamp value: {other}"))),
    }
}

/// Convert an Arrow RecordBatch to JSON records
///
/// Returns a vector of JSON objects, one per row in the batch.
pub fn arrow_to_json(batch: &RecordBatch) -> Result<Vec<Value>> {
    let schema = batch.schema();
    let num_rows = batch.num_rows();
    let mut records = Vec::with_capacity(num_rows);

    for row_idx in 0..num_rows {
        let mut record = serde_json::Map::new();

        for (col_idx, field) in schema.fields().iter().enumerate() {
            let column = batch.column(col_idx);
            let value = array_value_to_json(column.as_ref(), row_idx)?;
            record.insert(field.name().clone(), value);
        }

        records.push(Value::Object(record));
    }

    Ok(records)
}

/// Downcast an array or fail with the expected type name
fn downcast<'a, T: 'static>(array: &'a dyn Array, name: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::output(format!("Failed to downcast to {name}")))
}

/// Convert a single array element to JSON
fn array_value_to_json(array: &dyn Array, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    match array.data_type() {
        DataType::Null => Ok(Value::Null),

        DataType::Boolean => Ok(Value::Bool(
            downcast::<BooleanArray>(array, "BooleanArray")?.value(row),
        )),

        DataType::Int32 => Ok(Value::Number(
            downcast::<Int32Array>(array, "Int32Array")?.value(row).into(),
        )),

        DataType::Int64 => Ok(Value::Number(
            downcast::<Int64Array>(array, "Int64Array")?.value(row).into(),
        )),

        DataType::Float64 => {
            let val = downcast::<Float64Array>(array, "Float64Array")?.value(row);
            Ok(serde_json::Number::from_f64(val).map_or(Value::Null, Value::Number))
        }

        DataType::Utf8 => Ok(Value::String(
            downcast::<StringArray>(array, "StringArray")?
                .value(row)
                .to_string(),
        )),

        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            let millis =
                downcast::<TimestampMillisecondArray>(array, "TimestampMillisecondArray")?
                    .value(row);
            let dt = DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| Error::output(format!("Timestamp out of range: {millis}")))?;
            Ok(Value::String(
                dt.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            ))
        }

        other => Ok(Value::String(format!("{other:?}"))),
    }
}
