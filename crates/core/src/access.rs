//! Authorisation boundary for privileged queue operations.
//!
//! The core never verifies identities itself. Callers build an [`AccessContext`] from
//! whatever credential their transport carries and the injected [`AccessGate`] decides
//! whether that context is privileged. Reading the queue and removing cases require a
//! privileged context; booking does not.

use std::fmt;

/// Per-call authorisation context.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccessContext {
    token: Option<String>,
}

impl AccessContext {
    /// Context with no credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context carrying a capability token. Blank tokens are treated as absent.
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self { token: Some(token) }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Debug for AccessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Decides whether a caller may read the queue or remove cases.
pub trait AccessGate: Send + Sync {
    fn is_privileged(&self, ctx: &AccessContext) -> bool;
}

/// Gate that refuses every caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct DenyAll;

impl AccessGate for DenyAll {
    fn is_privileged(&self, _ctx: &AccessContext) -> bool {
        false
    }
}
