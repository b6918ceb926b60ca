use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::errors::ServiceError;
use crate::snapshot::{PvEntry, PvStore, Record};
use crate::storage::json_map_store::JsonMapStore;

/// Result of one write request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub applied: usize,
    pub skipped: Vec<String>,
}

/// File-backed process-variable snapshot.
/// Keeps a map of `name -> {type, value}` persisted as JSON.
#[derive(Clone)]
pub struct SnapshotStore {
    store: Arc<JsonMapStore<String, PvEntry>>,
}

impl SnapshotStore {
    /// Load the snapshot from `path`; a missing file starts an empty snapshot.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, PvEntry>::new(path).await?;
        info!(path = %store.path().display(), entries = store.len().await, "snapshot loaded");
        Ok(Arc::new(Self { store }))
    }

    #[cfg(test)]
    pub async fn get(&self, name: &str) -> Option<Record> {
        self.store.get(&name.to_string()).await.map(|e| Record::from_entry(name, e))
    }

    /// Every record, ordered by name.
    #[cfg(test)]
    pub async fn list(&self) -> Vec<Record> {
        self.store.list().await.into_iter().map(|(n, e)| Record::from_entry(n, e)).collect()
    }

    /// Upsert a single record and persist.
    #[cfg(test)]
    pub async fn put(&self, record: Record) -> Result<(), ServiceError> {
        let (name, entry) = record.into_entry();
        self.store.insert(name, entry).await
    }

    pub async fn read(&self, names: &[String]) -> Vec<Record> {
        let found = self.store.get_many(names).await;
        names
            .iter()
            .zip(found)
            .filter_map(|(name, entry)| match entry {
                Some(e) => Some(Record::from_entry(name.as_str(), e)),
                None => {
                    debug!(pv = %name, "unknown pv skipped");
                    None
                }
            })
            .collect()
    }

    /// Upsert each descriptor, skipping malformed ones, then rewrite the file.
    /// The file is rewritten even when nothing changed.
    pub async fn write(&self, descriptors: &[String]) -> Result<WriteOutcome, ServiceError> {
        let outcome = self
            .store
            .update_map(|map| {
                let mut outcome = WriteOutcome::default();
                for descriptor in descriptors {
                    match Record::parse_descriptor(descriptor) {
                        Ok(record) => {
                            let (name, entry) = record.into_entry();
                            map.insert(name, entry);
                            outcome.applied += 1;
                        }
                        Err(e) => {
                            warn!(error = %e, "skipping write field");
                            outcome.skipped.push(descriptor.clone());
                        }
                    }
                }
                Ok(outcome)
            })
            .await?;
        info!(applied = outcome.applied, skipped = outcome.skipped.len(), "snapshot persisted");
        Ok(outcome)
    }
}

#[async_trait]
impl PvStore for SnapshotStore {
    async fn read(&self, names: &[String]) -> Vec<Record> { self.read(names).await }
    async fn write(&self, descriptors: &[String]) -> Result<WriteOutcome, ServiceError> { self.write(descriptors).await }
}
