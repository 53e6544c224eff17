//! Record sources

use super::location::StoreLocation;
use super::types::{RecordSource, Selector};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use glob::Pattern;
use object_store::ObjectMeta;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Objects fetched concurrently per read
const FETCH_CONCURRENCY: usize = 16;

/// Reads records from objects in a store
///
/// Objects under the selector's prefix are filtered by its glob, fetched
/// and decoded in sorted key order so every run sees the same record order.
/// Keys with a path segment starting with `.` or `_` are ignored (editor
/// checkpoints, `_SUCCESS` markers).
#[derive(Debug, Clone)]
pub struct ObjectStoreSource {
    location: StoreLocation,
}

impl ObjectStoreSource {
    pub fn new(location: StoreLocation) -> Self {
        Self { location }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Keys matching the selector, sorted
    pub async fn list(&self, selector: &Selector) -> Result<Vec<ObjectMeta>> {
        let pattern = Pattern::new(&selector.pattern).map_err(|e| {
            Error::invalid_value("pattern", format!("'{}': {e}", selector.pattern))
        })?;
        let base = self.location.path(&selector.prefix)?;

        let mut objects: Vec<ObjectMeta> = self
            .location
            .store()
            .list(Some(&base))
            .try_collect()
            .await?;

        objects.retain(|meta| {
            StoreLocation::relative(&base, &meta.location)
                .is_some_and(|rel| !is_hidden(rel) && pattern.matches(rel))
        });
        objects.sort_by(|a, b| a.location.cmp(&b.location));
        Ok(objects)
    }
}

#[async_trait]
impl RecordSource for ObjectStoreSource {
    async fn read(&self, selector: &Selector) -> Result<Vec<Value>> {
        let objects = self.list(selector).await?;
        let decoder = selector.decoder();
        let store = Arc::clone(self.location.store());

        let bodies: Vec<_> = futures::stream::iter(objects.iter().cloned())
            .map(|meta| {
                let store = Arc::clone(&store);
                async move {
                    let bytes = store.get(&meta.location).await?.bytes().await?;
                    Ok::<_, Error>((meta, bytes))
                }
            })
            .buffered(FETCH_CONCURRENCY)
            .try_collect()
            .await?;

        let mut records = Vec::new();
        let mut skipped = 0;
        for (meta, bytes) in bodies {
            let url = self.location.display(&meta.location);
            let body = std::str::from_utf8(&bytes)
                .map_err(|e| Error::decode(format!("{url} is not UTF-8: {e}")))?;
            let outcome = decoder.decode(body).map_err(|e| Error::decode(format!("{url}: {e}")))?;

            debug!("Decoded {} records from {}", outcome.records.len(), url);
            skipped += outcome.skipped;
            records.extend(outcome.records);
        }

        if skipped > 0 {
            warn!(
                "Skipped {} undecodable lines under {}",
                skipped, selector.prefix
            );
        }
        info!(
            "Read {} records from {} objects under {}",
            records.len(),
            objects.len(),
            self.location.display(&self.location.path(&selector.prefix)?)
        );

        Ok(records)
    }
}

fn is_hidden(relative: &str) -> bool {
    relative
        .split('/')
        .any(|segment| segment.starts_with('.') || segment.starts_with('_'))
}

/// Serves fixed records per selector prefix
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    collections: HashMap<String, Vec<Value>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the records returned for a prefix
    #[must_use]
    pub fn with(mut self, prefix: impl Into<String>, records: Vec<Value>) -> Self {
        self.collections.insert(prefix.into(), records);
        self
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn read(&self, selector: &Selector) -> Result<Vec<Value>> {
        Ok(self
            .collections
            .get(&selector.prefix)
            .cloned()
            .unwrap_or_default())
    }
}
