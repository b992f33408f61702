//! Record Store Module
//!
//! The storage seam the rest of the crate talks through.
//!
//! ## Responsibilities
//! - `RecordStore`: raw keyed bytes with ancestor-scoped listing
//! - `Records`: typed adapter that encodes entities and enforces the registry
//! - `MemoryStore`: ordered in-memory store, optionally snapshotted to disk
//!
//! ## Layering
//! ```text
//!   UserService
//!       │  typed entities
//!       ▼
//!   Records<S>  ── Registry check, bincode encode/decode
//!       │  RecordKey + bytes
//!       ▼
//!   S: RecordStore  (MemoryStore, or any external engine)
//! ```

mod memory;
mod records;
mod registry;
mod snapshot;

use std::sync::Arc;

pub use memory::MemoryStore;
pub use records::Records;
pub use registry::Registry;
pub use snapshot::{MAGIC, SNAPSHOT_VERSION};

use crate::error::Result;
use crate::key::{EntityKind, RecordKey};

/// A raw key-value store with ancestor-scoped listing
///
/// All operations are synchronous and never retried; any failure is
/// returned to the caller unchanged.
pub trait RecordStore: Send + Sync {
    /// Point lookup; `Ok(None)` on a miss
    fn get(&self, key: &RecordKey) -> Result<Option<Vec<u8>>>;

    /// Upsert; last writer wins
    fn put(&self, key: RecordKey, value: Vec<u8>) -> Result<()>;

    /// Remove a record if present. Returns whether anything was removed;
    /// deleting a missing key is not an error.
    fn delete(&self, key: &RecordKey) -> Result<bool>;

    /// Every `kind` record rooted under `owner`
    ///
    /// Callers must not rely on the order of the result.
    fn list_by_ancestor(
        &self,
        kind: EntityKind,
        owner: &str,
    ) -> Result<Vec<(RecordKey, Vec<u8>)>>;

    /// Hand out a fresh identifier for a `kind` record keyed by id
    fn allocate_id(&self, kind: EntityKind) -> Result<u64>;
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn get(&self, key: &RecordKey) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: RecordKey, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &RecordKey) -> Result<bool> {
        (**self).delete(key)
    }

    fn list_by_ancestor(
        &self,
        kind: EntityKind,
        owner: &str,
    ) -> Result<Vec<(RecordKey, Vec<u8>)>> {
        (**self).list_by_ancestor(kind, owner)
    }

    fn allocate_id(&self, kind: EntityKind) -> Result<u64> {
        (**self).allocate_id(kind)
    }
}
