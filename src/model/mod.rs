//! Entity Model
//!
//! The three stored entity types and how each derives its key.
//!
//! ## Ownership
//! ```text
//! User (root, keyed by email)
//!  ├── LibraryCard (keyed by card filter within the user)
//!  └── Vacation    (keyed by store-generated id within the user)
//! ```
//!
//! Constructing an entity never persists it; that is always an explicit
//! store call.

mod library_card;
mod user;
mod vacation;

pub use library_card::LibraryCard;
pub use user::User;
pub use vacation::Vacation;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::key::{EntityKind, RecordKey};

/// A type that can be stored through [`Records`](crate::store::Records)
pub trait Entity: Serialize + DeserializeOwned {
    /// The kind every key of this type carries
    const KIND: EntityKind;

    /// This entity's key, derived from its identity fields
    fn key(&self) -> RecordKey;
}
