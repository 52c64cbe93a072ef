//! Static session context.
//!
//! Holds the current token in memory. The sign-in flow (out of scope here)
//! calls `sign_in`/`sign_out`; the planner only reads.
//!
//! # Example
//!
//! ```ignore
//! use course_planner::adapters::session::StaticSession;
//!
//! let session = StaticSession::signed_out();
//! session.sign_in("token-from-login");
//! assert!(session.is_signed_in());
//! ```

use std::sync::RwLock;

use crate::domain::foundation::SessionToken;
use crate::ports::SessionContext;

/// In-memory session context.
#[derive(Debug, Default)]
pub struct StaticSession {
    token: RwLock<Option<SessionToken>>,
}

impl StaticSession {
    /// Creates a context signed in with `token`. A blank token means signed out.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(SessionToken::new(token)),
        }
    }

    /// Creates a context with no session.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Creates a context from an environment variable, signed out if unset.
    pub fn from_env(var: &str) -> Self {
        std::env::var(var).map(Self::new).unwrap_or_default()
    }

    /// Replaces the current token.
    pub fn sign_in(&self, token: impl Into<String>) {
        *self.write() = SessionToken::new(token);
    }

    /// Drops the current token.
    pub fn sign_out(&self) {
        *self.write() = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<SessionToken>> {
        self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionContext for StaticSession {
    fn token(&self) -> Option<SessionToken> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
