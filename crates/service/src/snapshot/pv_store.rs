use crate::errors::ServiceError;
use crate::snapshot::{Record, WriteOutcome};
use async_trait::async_trait;

/// Trait abstraction for process-variable snapshot storage.
/// Handlers only see this seam; the stub ships a JSON file-backed one.
#[async_trait]
pub trait PvStore: Send + Sync {
    /// Records for the names that exist, in the order requested.
    async fn read(&self, names: &[String]) -> Vec<Record>;
    /// Upsert every well-formed descriptor, then persist the whole snapshot.
    async fn write(&self, descriptors: &[String]) -> Result<WriteOutcome, ServiceError>;
}
