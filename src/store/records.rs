//! Typed record adapter
//!
//! Wraps a raw [`RecordStore`] and speaks in entities instead of bytes.
//! Every call checks the entity's kind against the registry the adapter was
//! built with.

use crate::error::{PatronError, Result};
use crate::key::RecordKey;
use crate::model::Entity;

use super::{RecordStore, Registry};

pub struct Records<S> {
    store: S,
    registry: Registry,
}

impl<S: RecordStore> Records<S> {
    pub fn new(store: S, registry: Registry) -> Self {
        Self { store, registry }
    }

    /// Point lookup; `Ok(None)` when absent
    pub fn get<E: Entity>(&self, key: &RecordKey) -> Result<Option<E>> {
        self.check::<E>(key)?;
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Upsert an entity under its derived key
    pub fn put<E: Entity>(&self, entity: &E) -> Result<()> {
        let key = entity.key();
        self.check::<E>(&key)?;
        let bytes = bincode::serialize(entity)?;
        self.store.put(key, bytes)
    }

    /// Delete an entity if it still exists. Returns whether it did.
    pub fn delete<E: Entity>(&self, entity: &E) -> Result<bool> {
        let key = entity.key();
        self.check::<E>(&key)?;
        self.store.delete(&key)
    }

    /// Every `E` rooted under `owner`, in store order
    pub fn list_by_ancestor<E: Entity>(&self, owner: &str) -> Result<Vec<E>> {
        self.registry.ensure(E::KIND)?;
        self.store
            .list_by_ancestor(E::KIND, owner)?
            .into_iter()
            .map(|(_, bytes)| bincode::deserialize(&bytes).map_err(PatronError::from))
            .collect()
    }

    /// Fresh store-generated id for a new `E`
    pub fn allocate_id<E: Entity>(&self) -> Result<u64> {
        self.registry.ensure(E::KIND)?;
        self.store.allocate_id(E::KIND)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn check<E: Entity>(&self, key: &RecordKey) -> Result<()> {
        self.registry.ensure(E::KIND)?;
        if key.kind != E::KIND {
            return Err(PatronError::KindMismatch {
                expected: E::KIND,
                found: key.kind,
            });
        }
        Ok(())
    }
}
