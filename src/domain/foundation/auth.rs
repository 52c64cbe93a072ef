//! Session types for the domain layer.
//!
//! The planner never authenticates anyone itself. An outer session provider
//! hands it an opaque bearer token through the `SessionContext` port, and the
//! token is only ever forwarded to the planner store.
//!
//! # Design Decisions
//!
//! - `SessionToken` wraps `secrecy::Secret` so it never shows up in `Debug`
//!   output or logs
//! - Absence of a token is modelled as `Option::None` at the port, not as an
//!   error variant here

use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// Opaque bearer token for the remote planner store.
#[derive(Clone)]
pub struct SessionToken(Secret<String>);

impl SessionToken {
    /// Wraps a raw token. Blank tokens are treated as "no session".
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return None;
        }
        Some(Self(Secret::new(token)))
    }

    /// Exposes the raw token for building request headers.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_no_session() {
        assert!(SessionToken::new("").is_none());
        assert!(SessionToken::new("   ").is_none());
    }

    #[test]
    fn token_exposes_raw_value() {
        let token = SessionToken::new("abc123").unwrap();
        assert_eq!(token.expose(), "abc123");
    }

    #[test]
    fn debug_output_is_redacted() {
        let token = SessionToken::new("super-secret").unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
