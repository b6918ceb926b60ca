//! Process-variable snapshot: the record model, the file-backed store the
//! HTTP stub serves from, and the storage trait handlers depend on.

pub mod pv_store;
pub mod record;
pub mod store;

pub use pv_store::PvStore;
pub use record::{PvEntry, Record};
pub use store::{SnapshotStore, WriteOutcome};
