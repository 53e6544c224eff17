//! A named, schema-carrying table ready for a sink

use super::schema::table_schema;
use crate::error::Result;
use crate::output::json_to_arrow;
use crate::partition::{split_rows, Partition, PartitionSpec};
use crate::types::TableName;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use serde::Serialize;
use serde_json::Value;

/// One output table: rows plus the schema and partition spec it is written with
#[derive(Debug, Clone)]
pub struct Table {
    name: TableName,
    schema: SchemaRef,
    partition_spec: PartitionSpec,
    rows: Vec<Value>,
}

impl Table {
    /// Build a table from typed rows
    pub fn from_rows<T: Serialize>(name: TableName, rows: &[T]) -> Result<Self> {
        let rows = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            schema: table_schema(name),
            partition_spec: PartitionSpec::for_table(name),
            rows,
        })
    }

    /// Table name
    pub fn name(&self) -> TableName {
        self.name
    }

    /// Arrow schema
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Partition columns the table is split by
    pub fn partition_spec(&self) -> &PartitionSpec {
        &self.partition_spec
    }

    /// Rows as JSON objects
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split the rows by partition key
    pub fn partitions(&self) -> Vec<Partition> {
        split_rows(&self.partition_spec, &self.rows)
    }

    /// Convert all rows to a single RecordBatch
    pub fn to_batch(&self) -> Result<RecordBatch> {
        json_to_arrow(&self.rows, &self.schema)
    }

    /// Convert one partition's rows to a RecordBatch
    pub fn partition_batch(&self, partition: &Partition) -> Result<RecordBatch> {
        json_to_arrow(&partition.rows, &self.schema)
    }
}
