//! Vacation entity
//!
//! A date range during which a user is away. `start <= end` is expected but
//! not checked here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::{EntityKind, LocalId, RecordKey};

use super::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacation {
    owner: String,

    /// Store-generated, unique within the owner
    id: u64,

    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Vacation {
    pub fn new(
        owner: impl Into<String>,
        id: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            owner: owner.into(),
            id,
            start,
            end,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Ended strictly before `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end < now
    }

    /// Range strictly contains `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start < now && self.end > now
    }
}

impl Entity for Vacation {
    const KIND: EntityKind = EntityKind::Vacation;

    fn key(&self) -> RecordKey {
        RecordKey::child(EntityKind::Vacation, self.owner.as_str(), LocalId::Id(self.id))
    }
}
