//! Record keys
//!
//! Every record lives under a composite key `(kind, owner, local)`:
//!
//! ```text
//! User         (User,        None,          Name("ann@example.com"))
//! LibraryCard  (LibraryCard, Some("ann@…"), Name("branch:east"))
//! Vacation     (Vacation,    Some("ann@…"), Id(7))
//! ```
//!
//! Keys order lexicographically over `(kind, owner, local)`, so all children
//! of one owner and kind sit next to each other in an ordered map. An
//! ancestor-scoped query is a contiguous range scan.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The entity types a store knows how to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    LibraryCard,
    Vacation,
}

impl EntityKind {
    /// All kinds, in key order
    pub const ALL: [EntityKind; 3] = [
        EntityKind::User,
        EntityKind::LibraryCard,
        EntityKind::Vacation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::LibraryCard => "LibraryCard",
            EntityKind::Vacation => "Vacation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of a key that is unique within its owner
///
/// `Name` sorts before `Id`, and `Name("")` is the smallest local id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LocalId {
    /// Caller-chosen name (user email, card filter)
    Name(String),

    /// Store-generated identifier
    Id(u64),
}

impl LocalId {
    /// Smallest possible local id
    pub(crate) fn min() -> Self {
        LocalId::Name(String::new())
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalId::Name(name) => write!(f, "{name}"),
            LocalId::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// Composite key for a stored record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub kind: EntityKind,

    /// Identity of the owning root record; `None` for roots
    pub owner: Option<String>,

    pub local: LocalId,
}

impl RecordKey {
    /// Key of a root record (no ancestor)
    pub fn root(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            owner: None,
            local: LocalId::Name(name.into()),
        }
    }

    /// Key of a child record rooted under `owner`
    pub fn child(kind: EntityKind, owner: impl Into<String>, local: LocalId) -> Self {
        Self {
            kind,
            owner: Some(owner.into()),
            local,
        }
    }

    /// First key of the range holding every `kind` child of `owner`
    pub(crate) fn ancestor_start(kind: EntityKind, owner: &str) -> Self {
        Self::child(kind, owner, LocalId::min())
    }

    /// Whether this key is a `kind` child of `owner`
    pub fn is_child_of(&self, kind: EntityKind, owner: &str) -> bool {
        self.kind == kind && self.owner.as_deref() == Some(owner)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{}({}/{})", self.kind, owner, self.local),
            None => write!(f, "{}({})", self.kind, self.local),
        }
    }
}
