use serde::{Deserialize, Serialize};

use crate::key::{EntityKind, LocalId, RecordKey};

use super::Entity;

/// A library card owned by one user, unique per card filter within that user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryCard {
    owner: String,
    filter: String,
}

impl LibraryCard {
    pub fn new(owner: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            filter: filter.into(),
        }
    }

    /// Email of the owning user
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn key_for(owner: &str, filter: &str) -> RecordKey {
        RecordKey::child(EntityKind::LibraryCard, owner, LocalId::Name(filter.to_string()))
    }
}

impl Entity for LibraryCard {
    const KIND: EntityKind = EntityKind::LibraryCard;

    fn key(&self) -> RecordKey {
        Self::key_for(&self.owner, &self.filter)
    }
}
