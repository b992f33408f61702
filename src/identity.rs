//! Identity provider seam
//!
//! The crate never authenticates anyone. It asks an [`IdentityProvider`] who
//! the caller is and whether they are an administrator.

/// Source of the verified caller identity
pub trait IdentityProvider: Send + Sync {
    fn is_caller_authenticated(&self) -> bool;

    fn is_caller_admin(&self) -> bool;

    /// Verified identity (email) of the caller, if any
    fn current_caller_identity(&self) -> Option<String>;
}

/// A provider with a fixed answer, set at construction
///
/// Used by the CLI (caller given on the command line) and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    caller: Option<String>,
    admin: bool,
}

impl StaticIdentity {
    /// No caller; every check fails
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated, non-admin caller
    pub fn caller(email: impl Into<String>) -> Self {
        Self {
            caller: Some(email.into()),
            admin: false,
        }
    }

    /// An authenticated administrator
    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            caller: Some(email.into()),
            admin: true,
        }
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

impl IdentityProvider for StaticIdentity {
    fn is_caller_authenticated(&self) -> bool {
        self.caller.is_some()
    }

    // Not gated on a caller; UserService::is_admin combines the two.
    fn is_caller_admin(&self) -> bool {
        self.admin
    }

    fn current_caller_identity(&self) -> Option<String> {
        self.caller.clone()
    }
}

impl<P: IdentityProvider + ?Sized> IdentityProvider for std::sync::Arc<P> {
    fn is_caller_authenticated(&self) -> bool {
        (**self).is_caller_authenticated()
    }

    fn is_caller_admin(&self) -> bool {
        (**self).is_caller_admin()
    }

    fn current_caller_identity(&self) -> Option<String> {
        (**self).current_caller_identity()
    }
}
