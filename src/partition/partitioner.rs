//! Row partitioning
//!
//! Groups table rows by partition key and renders Hive path segments.

use super::types::{Partition, PartitionKey, PartitionSpec};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Split rows into partitions
///
/// Partitions come out ordered by key; rows keep their table order inside
/// each partition. An unpartitioned spec yields a single partition with an
/// empty key, even for an empty table, so every table gets written.
pub fn split_rows(spec: &PartitionSpec, rows: &[Value]) -> Vec<Partition> {
    if !spec.is_partitioned() {
        return vec![Partition {
            key: PartitionKey::default(),
            rows: rows.to_vec(),
        }];
    }

    let mut groups: BTreeMap<PartitionKey, Vec<Value>> = BTreeMap::new();
    for row in rows {
        groups.entry(spec.key_for(row)).or_default().push(row.clone());
    }

    groups
        .into_iter()
        .map(|(key, rows)| Partition { key, rows })
        .collect()
}

/// Textual value of a partition column (None for null or missing)
pub fn partition_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Percent-escape a partition value the way Hive does
pub fn escape_path_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if needs_escape(c) {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                let _ = write!(escaped, "%{byte:02X}");
            }
        } else {
            escaped.push(c);
        }
    }
    escaped
}

fn needs_escape(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '"' | '#' | '%' | '\'' | '*' | '/' | ':' | '=' | '?' | '\\' | '{' | '[' | ']' | '^'
        )
}
