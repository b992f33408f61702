//! Entity registry
//!
//! The set of entity kinds a store is configured to hold. Built once at
//! startup and handed to [`Records`](super::Records) through the config.

use std::collections::BTreeSet;

use crate::error::{PatronError, Result};
use crate::key::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registry {
    kinds: BTreeSet<EntityKind>,
}

impl Registry {
    /// A registry with no kinds
    pub fn empty() -> Self {
        Self::default()
    }

    /// User, LibraryCard and Vacation
    pub fn standard() -> Self {
        EntityKind::ALL.into_iter().collect()
    }

    pub fn register(mut self, kind: EntityKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    pub fn contains(&self, kind: EntityKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Fail with `UnregisteredKind` unless `kind` is registered
    pub fn ensure(&self, kind: EntityKind) -> Result<()> {
        if self.contains(kind) {
            Ok(())
        } else {
            Err(PatronError::UnregisteredKind(kind))
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl FromIterator<EntityKind> for Registry {
    fn from_iter<T: IntoIterator<Item = EntityKind>>(iter: T) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}
