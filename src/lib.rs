//! # patronkv
//!
//! Per-user record keeping over an ancestor-keyed key-value store:
//! - Users keyed by lowercase email, with last-login tracking
//! - Library cards and vacations stored as children of their user
//! - Find-or-create resolution of the authenticated caller
//! - Vacation windows that prune expired vacations as they are scanned
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Higher layers (CLI, HTTP, …)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      UserService                             │
//! │      (find-or-create, card lookups, vacation windows)        │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │   Records<S>    │                │IdentityProvider │
//!   │ (typed adapter) │                │   (external)    │
//!   └────────┬────────┘                └─────────────────┘
//!            │
//!            ▼
//!   ┌─────────────────┐
//!   │ S: RecordStore  │
//!   │  (MemoryStore)  │
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod clock;
pub mod key;

pub mod identity;
pub mod model;
pub mod store;
pub mod service;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PatronError, Result};
pub use config::Config;
pub use clock::{Clock, DayBoundary, FixedClock, SystemClock};
pub use key::{EntityKind, LocalId, RecordKey};
pub use identity::{IdentityProvider, StaticIdentity};
pub use model::{Entity, LibraryCard, User, Vacation};
pub use store::{MemoryStore, RecordStore, Records, Registry};
pub use service::{UserService, VacationScan};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of patronkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
