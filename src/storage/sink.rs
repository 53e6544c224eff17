//! Record sinks

use super::location::StoreLocation;
use super::types::RecordSink;
use crate::error::{Error, Result};
use crate::model::Table;
use crate::output::{encode_parquet, ParquetWriterConfig};
use crate::types::TableName;
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path as ObjectPath;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// File name of the single data file in each partition directory
pub const PART_FILE: &str = "part-00000.parquet";

/// Directory under the sink root where a table is assembled before it goes live
pub const STAGING_DIR: &str = "_staging";

/// One encoded partition file
struct PartFile {
    staged: ObjectPath,
    live: ObjectPath,
    data: Bytes,
    rows: usize,
}

/// Writes tables as Hive-partitioned Parquet files
///
/// Layout: `{table}/{col}={value}/.../part-00000.parquet`. Every partition
/// file is encoded and uploaded under `_staging/{table}/` first. The live
/// table directory is only touched once all uploads succeeded: staged files
/// are copied into place, then keys the new run did not produce are removed.
#[derive(Debug, Clone)]
pub struct ParquetSink {
    location: StoreLocation,
    config: ParquetWriterConfig,
}

impl ParquetSink {
    pub fn new(location: StoreLocation, config: ParquetWriterConfig) -> Self {
        Self { location, config }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Relative key of a partition's data file
    pub fn file_key(table: TableName, partition_path: &str) -> String {
        if partition_path.is_empty() {
            format!("{table}/{PART_FILE}")
        } else {
            format!("{table}/{partition_path}/{PART_FILE}")
        }
    }

    /// Encode every partition of a table in memory
    fn encode(&self, table: &Table) -> Result<Vec<PartFile>> {
        table
            .partitions()
            .iter()
            .map(|partition| {
                let batch = table.partition_batch(partition)?;
                let key = Self::file_key(table.name(), &partition.key.path());
                Ok(PartFile {
                    staged: self.location.path(&format!("{STAGING_DIR}/{key}"))?,
                    live: self.location.path(&key)?,
                    data: encode_parquet(&batch, &self.config)?,
                    rows: partition.len(),
                })
            })
            .collect()
    }

    /// Keys currently stored under a directory
    async fn list_keys(&self, table: TableName, base: &ObjectPath) -> Result<Vec<ObjectPath>> {
        self.location
            .store()
            .list(Some(base))
            .map_ok(|meta| meta.location)
            .try_collect()
            .await
            .map_err(|e| Error::sink(table.as_str(), e.to_string()))
    }

    /// Delete every key under a directory
    async fn remove_all(&self, table: TableName, base: &ObjectPath) -> Result<()> {
        for key in self.list_keys(table, base).await? {
            self.location
                .store()
                .delete(&key)
                .await
                .map_err(|e| Error::sink(table.as_str(), e.to_string()))?;
        }
        Ok(())
    }

    /// Upload every file to the staging area
    async fn stage(&self, table: TableName, files: &[PartFile]) -> Result<()> {
        for file in files {
            self.location
                .store()
                .put(&file.staged, file.data.clone().into())
                .await
                .map_err(|e| {
                    Error::sink(
                        table.as_str(),
                        format!("{}: {e}", self.location.display(&file.staged)),
                    )
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecordSink for ParquetSink {
    async fn write_table(&self, table: &Table) -> Result<Vec<String>> {
        let name = table.name();
        let files = self.encode(table)?;
        let staging = self.location.path(&format!("{STAGING_DIR}/{name}"))?;
        let live = self.location.path(name.as_str())?;

        // Leftovers of an interrupted run
        self.remove_all(name, &staging).await?;

        if let Err(e) = self.stage(name, &files).await {
            if let Err(cleanup) = self.remove_all(name, &staging).await {
                warn!("Could not clean up staged files of {}: {}", name, cleanup);
            }
            return Err(e);
        }

        let previous = self.list_keys(name, &live).await?;
        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            let url = self.location.display(&file.live);
            self.location
                .store()
                .copy(&file.staged, &file.live)
                .await
                .map_err(|e| Error::sink(name.as_str(), format!("{url}: {e}")))?;
            debug!("Wrote {} rows to {}", file.rows, url);
            written.push(url);
        }

        let current: HashSet<&ObjectPath> = files.iter().map(|f| &f.live).collect();
        for stale in previous.iter().filter(|key| !current.contains(key)) {
            debug!("Removing stale {}", self.location.display(stale));
            self.location
                .store()
                .delete(stale)
                .await
                .map_err(|e| Error::sink(name.as_str(), e.to_string()))?;
        }
        self.remove_all(name, &staging).await?;

        info!(
            "Wrote table {} ({} rows, {} files)",
            name,
            table.num_rows(),
            written.len()
        );
        Ok(written)
    }
}

/// Keeps written tables in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: Mutex<BTreeMap<TableName, Table>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A previously written table
    pub fn table(&self, name: TableName) -> Option<Table> {
        self.tables.lock().ok()?.get(&name).cloned()
    }

    /// Names of the tables written so far
    pub fn table_names(&self) -> Vec<TableName> {
        self.tables
            .lock()
            .map(|tables| tables.keys().copied().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn write_table(&self, table: &Table) -> Result<Vec<String>> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| Error::sink(table.name().as_str(), "memory sink lock poisoned"))?;
        tables.insert(table.name(), table.clone());
        Ok(vec![format!("memory://{}", table.name())])
    }
}
