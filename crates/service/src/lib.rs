//! Service layer for the pvSave test fixtures.
//! - `snapshot`: the process-variable snapshot served by the HTTP stub.
//! - `compare`: key-wise diff of two snapshot files.
//! - `storage`: the JSON file-backed map both build on.

pub mod errors;
pub mod storage;
pub mod snapshot;
pub mod compare;
