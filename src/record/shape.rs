//! Record shapes
//!
//! A shape lists every field name a record kind may carry. A single record
//! that shares no field with the shape is junk and gets rejected on its own.
//! A batch where no record fits was fed to the wrong extractor, which is a
//! wiring error and aborts the batch.

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::Value;
use tracing::debug;

/// Expected field set of one record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    /// Record kind, used in error messages
    pub name: &'static str,
    /// Every field name the kind may carry (aliases included)
    pub fields: &'static [&'static str],
}

/// Track metadata records
pub const TRACK_SHAPE: RecordShape = RecordShape {
    name: "track",
    fields: &[
        "song_id",
        "title",
        "artist_id",
        "year",
        "duration",
        "artist_name",
        "artist_location",
        "artist_latitude",
        "artist_longitude",
        "num_songs",
    ],
};

/// Activity event records
pub const ACTIVITY_SHAPE: RecordShape = RecordShape {
    name: "activity",
    fields: &[
        "artist",
        "auth",
        "firstName",
        "first_name",
        "gender",
        "itemInSession",
        "lastName",
        "last_name",
        "length",
        "level",
        "location",
        "method",
        "page",
        "registration",
        "sessionId",
        "session_id",
        "song",
        "status",
        "ts",
        "userAgent",
        "user_agent",
        "userId",
        "user_id",
    ],
};

impl RecordShape {
    /// Number of this shape's fields present on the record
    pub fn overlap(&self, record: &JsonObject) -> usize {
        self.fields
            .iter()
            .filter(|f| record.contains_key(**f))
            .count()
    }

    /// Check that a raw record is an object of this kind
    pub fn check<'a>(&self, index: usize, record: &'a Value) -> Result<&'a JsonObject> {
        let Value::Object(obj) = record else {
            return Err(Error::schema_mismatch(
                self.name,
                format!("record {index} is not an object: {}", kind_of(record)),
            ));
        };

        if self.overlap(obj) == 0 {
            let mut found: Vec<&str> = obj.keys().map(String::as_str).collect();
            found.truncate(8);
            return Err(Error::schema_mismatch(
                self.name,
                format!(
                    "record {index} has none of the expected fields (found: {})",
                    found.join(", ")
                ),
            ));
        }

        Ok(obj)
    }

    /// Sort a batch into records of this kind and rejected ones
    ///
    /// Fails with `SchemaMismatch` only when the batch is non-empty and not a
    /// single record fits the shape.
    pub fn check_all<'a>(&self, records: &'a [Value]) -> Result<ShapeCheck<'a>> {
        let mut checked = ShapeCheck::default();
        let mut first_error = None;

        for (index, record) in records.iter().enumerate() {
            match self.check(index, record) {
                Ok(obj) => checked.objects.push((index, obj)),
                Err(e) => {
                    debug!("Rejecting {} record {index}: {e}", self.name);
                    checked.rejected += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if checked.objects.is_empty() => Err(e),
            _ => Ok(checked),
        }
    }
}

/// Outcome of checking a batch against a shape
#[derive(Debug, Clone, Default)]
pub struct ShapeCheck<'a> {
    /// Records of the expected kind with their position in the batch
    pub objects: Vec<(usize, &'a JsonObject)>,
    /// Records skipped as not of the expected kind
    pub rejected: usize,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
