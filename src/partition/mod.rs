//! Partition module
//!
//! Supports: Hive-style `column=value` directory partitioning
//!
//! # Overview
//!
//! Partitioned tables are physically split by the values of their partition
//! columns so range queries can skip whole directories:
//! - `songs` by `year` then `artist_id`
//! - `time` and `songplays` by `year` then `month`
//! - `artists` and `users` are written unpartitioned

mod partitioner;
mod types;

pub use partitioner::{escape_path_value, partition_value, split_rows};
pub use types::{Partition, PartitionKey, PartitionSpec, HIVE_DEFAULT_PARTITION};
