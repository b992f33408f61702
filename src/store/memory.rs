//! In-memory record store
//!
//! BTreeMap-based store with RwLock for concurrency, optionally backed by a
//! snapshot file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::Result;
use crate::key::{EntityKind, RecordKey};

use super::snapshot::{self, SnapshotBody};
use super::RecordStore;

/// Ordered in-memory store
///
/// ## Concurrency:
/// - `records`: Protected by RwLock (many concurrent readers, exclusive writer)
/// - `next_id`: Atomic counter (lock-free)
/// - All methods use `&self`
pub struct MemoryStore {
    /// Records ordered by key, so ancestor listings are range scans
    records: RwLock<BTreeMap<RecordKey, Vec<u8>>>,

    /// Next id handed out by `allocate_id` (shared across kinds)
    next_id: AtomicU64,

    /// Where `flush` writes the snapshot, if anywhere
    data_file: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store with no snapshot file
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            data_file: None,
        }
    }

    /// Open a store for the given config
    ///
    /// Loads `config.data_file` when set and present. A missing file gives an
    /// empty store that will be written there on the first flush.
    pub fn open(config: &Config) -> Result<Self> {
        let Some(path) = &config.data_file else {
            return Ok(Self::new());
        };

        let body = match snapshot::read(path) {
            Ok(Some(body)) => body,
            Ok(None) => {
                tracing::debug!(path = %path.display(), "No snapshot found, starting empty");
                SnapshotBody::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load snapshot");
                return Err(e);
            }
        };

        tracing::debug!(
            path = %path.display(),
            records = body.records.len(),
            "Loaded snapshot"
        );

        Ok(Self {
            records: RwLock::new(body.records.into_iter().collect()),
            next_id: AtomicU64::new(body.next_id.max(1)),
            data_file: Some(path.clone()),
        })
    }

    /// Write the snapshot file, if one is configured
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };

        // Hold the read lock across the id read so the image is consistent
        let records = self.records.read();
        let body = SnapshotBody {
            next_id: self.next_id.load(Ordering::SeqCst),
            records: records
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };
        drop(records);

        snapshot::write(path, &body)?;
        tracing::debug!(path = %path.display(), records = body.records.len(), "Flushed snapshot");
        Ok(())
    }

    /// Flush and drop the store
    pub fn close(self) -> Result<()> {
        self.flush()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Snapshot file path, if any
    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    /// Number of stored records across all kinds
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &RecordKey) -> Result<Option<Vec<u8>>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn put(&self, key: RecordKey, value: Vec<u8>) -> Result<()> {
        self.records.write().insert(key, value);
        Ok(())
    }

    fn delete(&self, key: &RecordKey) -> Result<bool> {
        Ok(self.records.write().remove(key).is_some())
    }

    fn list_by_ancestor(
        &self,
        kind: EntityKind,
        owner: &str,
    ) -> Result<Vec<(RecordKey, Vec<u8>)>> {
        let records = self.records.read();
        let start = RecordKey::ancestor_start(kind, owner);

        Ok(records
            .range(start..)
            .take_while(|(key, _)| key.is_child_of(kind, owner))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn allocate_id(&self, _kind: EntityKind) -> Result<u64> {
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}
