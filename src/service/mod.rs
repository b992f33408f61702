//! User Lifecycle & Query Service
//!
//! Resolves users by identity and answers per-user queries.
//!
//! ## Responsibilities
//! - Find-or-create users, refreshing last login on every resolution
//! - Admin check via the identity provider
//! - Library card lookups scoped to one user
//! - Vacation window computation with lazy cleanup (see `vacation`)
//!
//! ## Concurrency
//! No locking spans a multi-step operation. Two callers resolving the same
//! identity may both write; the later put wins, and since last login is the
//! only mutable field nothing else is lost.

mod vacation;

pub use vacation::VacationScan;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, DayBoundary, SystemClock};
use crate::config::Config;
use crate::error::{PatronError, Result};
use crate::identity::IdentityProvider;
use crate::model::{LibraryCard, User};
use crate::store::{RecordStore, Records};

/// The exposed surface of the crate
pub struct UserService<S, I> {
    records: Records<S>,
    identity: I,
    clock: Arc<dyn Clock>,
    day_boundary: DayBoundary,
}

impl<S: RecordStore, I: IdentityProvider> UserService<S, I> {
    /// Build a service over `store`, reading the system clock
    pub fn new(store: S, identity: I, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            records: Records::new(store, config.registry.clone()),
            identity,
            clock: Arc::new(SystemClock),
            day_boundary: config.day_boundary,
        })
    }

    /// Replace the clock (tests pin "now" with a `FixedClock`)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Resolve `identity` to its user, creating the user on first sight
    ///
    /// The identity is lowercased. An existing user gets `last_login`
    /// refreshed. Either way the user is written back before returning; if
    /// that write fails the error is returned and the user must be treated
    /// as not persisted.
    pub fn find_or_create(&self, identity: &str) -> Result<User> {
        let email = normalize(identity);
        let now = self.clock.now();

        let user = match self.records.get::<User>(&User::key_for(&email))? {
            Some(mut user) => {
                user.set_logged_in(now);
                tracing::debug!(email = %email, "Refreshed last login");
                user
            }
            None => {
                tracing::debug!(email = %email, "Creating user");
                User::new(email, now)
            }
        };

        self.records.put(&user)?;
        Ok(user)
    }

    /// Resolve the authenticated caller to their user
    ///
    /// Fails with `Unauthenticated` when the identity provider has no caller.
    pub fn find_or_create_caller(&self) -> Result<User> {
        let identity = self
            .identity
            .current_caller_identity()
            .ok_or(PatronError::Unauthenticated)?;
        self.find_or_create(&identity)
    }

    /// Look up a user without creating or touching it
    pub fn find(&self, identity: &str) -> Result<Option<User>> {
        let email = normalize(identity);
        self.records.get::<User>(&User::key_for(&email))
    }

    /// Whether the caller is a logged-in administrator
    pub fn is_admin(&self) -> bool {
        self.identity.is_caller_authenticated() && self.identity.is_caller_admin()
    }

    // =========================================================================
    // Library cards
    // =========================================================================

    /// Every card owned by `user`; empty when there are none
    pub fn library_cards(&self, user: &User) -> Result<Vec<LibraryCard>> {
        self.records.list_by_ancestor::<LibraryCard>(user.email())
    }

    /// The card `filter` owned by `user`, if any
    pub fn library_card(&self, user: &User, filter: &str) -> Result<Option<LibraryCard>> {
        self.records
            .get::<LibraryCard>(&LibraryCard::key_for(user.email(), filter))
    }

    /// Store a card for `user`, replacing any card with the same filter
    pub fn add_library_card(&self, user: &User, filter: &str) -> Result<LibraryCard> {
        let card = LibraryCard::new(user.email(), filter);
        self.records.put(&card)?;
        Ok(card)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn records(&self) -> &Records<S> {
        &self.records
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn day_boundary(&self) -> DayBoundary {
        self.day_boundary
    }
}

/// Canonical form of a user identity
fn normalize(identity: &str) -> String {
    identity.to_lowercase()
}
