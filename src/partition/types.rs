//! Partition types
//!
//! Defines the partition spec of each table and the key a row falls under.

use crate::types::TableName;
use serde_json::Value;

/// Directory value used when a partition column is null
pub const HIVE_DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Ordered list of partition columns for a table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionSpec {
    columns: Vec<String>,
}

impl PartitionSpec {
    /// Create a spec from column names, outermost first
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// No partitioning
    pub fn none() -> Self {
        Self::default()
    }

    /// The partition spec each table is written with
    pub fn for_table(table: TableName) -> Self {
        match table {
            TableName::Songs => Self::new(["year", "artist_id"]),
            TableName::Time | TableName::Songplays => Self::new(["year", "month"]),
            TableName::Artists | TableName::Users => Self::none(),
        }
    }

    /// Partition columns, outermost first
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the table is split at all
    pub fn is_partitioned(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Compute the partition key of a row
    pub fn key_for(&self, row: &Value) -> PartitionKey {
        PartitionKey {
            values: self
                .columns
                .iter()
                .map(|col| (col.clone(), row.get(col).and_then(super::partition_value)))
                .collect(),
        }
    }
}

/// The partition a row belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PartitionKey {
    /// Column name and its textual value (None for null)
    pub values: Vec<(String, Option<String>)>,
}

impl PartitionKey {
    /// Get the value of a partition column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Hive-style relative directory, e.g. `year=2018/month=11`
    ///
    /// Empty for unpartitioned tables.
    pub fn path(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| {
                let value = value
                    .as_deref()
                    .map_or_else(|| HIVE_DEFAULT_PARTITION.to_string(), super::escape_path_value);
                format!("{name}={value}")
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Rows sharing one partition key
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Key shared by every row
    pub key: PartitionKey,
    /// The rows, in table order
    pub rows: Vec<Value>,
}

impl Partition {
    /// Number of rows in the partition
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the partition is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
