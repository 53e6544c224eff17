//! Typed field accessors
//!
//! Every accessor takes a list of accepted names so camelCase log fields and
//! their snake_case aliases resolve the same way. The first present, non-null
//! name wins. Numbers and numeric strings are coerced both ways since the
//! upstream producers are not consistent about either.

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::Value;

/// Get the first present, non-null value among `names`
pub fn get_field<'a>(record: &'a JsonObject, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| record.get(*name))
        .find(|v| !v.is_null())
}

/// Get a string field
///
/// Numbers are rendered as their decimal text; blank strings count as absent.
/// Other strings are returned as stored, surrounding whitespace included.
pub fn get_string(record: &JsonObject, names: &[&str]) -> Option<String> {
    match get_field(record, names)? {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Get a floating-point field
///
/// Returns `Ok(None)` when absent and a `MalformedRecord` error when present
/// but not numeric.
pub fn get_f64(record: &JsonObject, names: &[&str]) -> Result<Option<f64>> {
    let Some(value) = get_field(record, names) else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(Error::malformed(
            field_label(names),
            format!("expected a number, got {value}"),
        )),
    }
}

/// Get an integer field
///
/// Integral floats (`1541121934796.0`) are accepted; fractional ones are not.
pub fn get_i64(record: &JsonObject, names: &[&str]) -> Result<Option<i64>> {
    let Some(value) = get_field(record, names) else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    };

    parsed.map(Some).ok_or_else(|| {
        Error::malformed(
            field_label(names),
            format!("expected an integer, got {value}"),
        )
    })
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn field_label(names: &[&str]) -> String {
    names.first().copied().unwrap_or("<unnamed>").to_string()
}
