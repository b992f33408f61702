//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::{EntityKind, RecordKey};

use super::Entity;

/// A user, identified by lowercase email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    email: String,

    /// Last time this user was resolved by a login
    pub last_login: DateTime<Utc>,
}

impl User {
    /// New user with `last_login` set to `now`
    ///
    /// `email` is stored as given; callers normalize it first.
    pub fn new(email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            last_login: now,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Key of the user record for `email`
    pub fn key_for(email: &str) -> RecordKey {
        RecordKey::root(EntityKind::User, email)
    }

    pub fn set_logged_in(&mut self, now: DateTime<Utc>) {
        self.last_login = now;
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn key(&self) -> RecordKey {
        Self::key_for(&self.email)
    }
}
