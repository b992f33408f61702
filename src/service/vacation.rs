//! Vacation window computation
//!
//! `vacation_ends` runs in two phases:
//!
//! ```text
//!   scan_vacations ──► VacationScan { expired, active } ──► prune_expired
//!   (read only)                                             (idempotent deletes)
//! ```
//!
//! The scan walks vacations in store order. Expired ones are collected and
//! scanning continues; the first active one is kept and scanning stops, so
//! anything after it is left untouched until a later call. With overlapping
//! active vacations the winner is whichever the store lists first.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::model::{User, Vacation};
use crate::store::RecordStore;

use super::UserService;

/// Outcome of classifying a user's vacations against one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacationScan {
    /// The instant the scan classified against
    pub now: DateTime<Utc>,

    /// Vacations seen with `end < now`, in scan order
    pub expired: Vec<Vacation>,

    /// First vacation seen whose range strictly contains `now`
    pub active: Option<Vacation>,
}

impl VacationScan {
    /// Classify `vacations` (in the order given) against `now`
    pub fn classify(vacations: impl IntoIterator<Item = Vacation>, now: DateTime<Utc>) -> Self {
        let mut expired = Vec::new();
        let mut active = None;

        for vacation in vacations {
            if vacation.is_expired(now) {
                expired.push(vacation);
            } else if vacation.is_active(now) {
                active = Some(vacation);
                break;
            }
        }

        Self {
            now,
            expired,
            active,
        }
    }

    /// End of the active vacation, or `now` when there is none
    pub fn available_from(&self) -> DateTime<Utc> {
        self.active.as_ref().map_or(self.now, |v| v.end)
    }
}

impl<S: RecordStore, I: IdentityProvider> UserService<S, I> {
    /// Every vacation owned by `user`, in store order
    pub fn all_vacations(&self, user: &User) -> Result<Vec<Vacation>> {
        self.records.list_by_ancestor::<Vacation>(user.email())
    }

    /// Store a new vacation for `user` under a fresh id
    pub fn add_vacation(
        &self,
        user: &User,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vacation> {
        let id = self.records.allocate_id::<Vacation>()?;
        let vacation = Vacation::new(user.email(), id, start, end);
        self.records.put(&vacation)?;
        tracing::debug!(email = %user.email(), id, %start, %end, "Added vacation");
        Ok(vacation)
    }

    /// Phase one: classify `user`'s vacations against `now`. Read only.
    pub fn scan_vacations(&self, user: &User, now: DateTime<Utc>) -> Result<VacationScan> {
        Ok(VacationScan::classify(self.all_vacations(user)?, now))
    }

    /// Phase two: delete every vacation the scan found expired
    ///
    /// Returns how many were actually removed. Vacations already gone (for
    /// instance pruned by a concurrent call) are skipped.
    pub fn prune_expired(&self, scan: &VacationScan) -> Result<usize> {
        let mut removed = 0;
        for vacation in &scan.expired {
            if self.records.delete(vacation)? {
                removed += 1;
                tracing::debug!(
                    email = %vacation.owner(),
                    id = vacation.id(),
                    end = %vacation.end,
                    "Pruned expired vacation"
                );
            }
        }
        Ok(removed)
    }

    /// Midnight of the day `user` is next available
    ///
    /// That is the end day of the user's active vacation, or today when they
    /// are not on one. This is not read only: expired vacations met during
    /// the scan are deleted.
    pub fn vacation_ends(&self, user: &User) -> Result<DateTime<Utc>> {
        let scan = self.scan_vacations(user, self.clock.now())?;
        self.prune_expired(&scan)?;

        if let Some(active) = &scan.active {
            tracing::info!(email = %user.email(), until = %active.end, "User is on vacation");
        }

        Ok(self.day_boundary.midnight(scan.available_from()))
    }
}
