//! Session Context Port - where the planner gets its bearer token.
//!
//! Replaces a process-wide token variable with an explicitly injected
//! collaborator. Authentication itself happens elsewhere.

use crate::domain::foundation::SessionToken;

/// Supplies the current session token, if any.
///
/// # Contract
///
/// - Return `None` when no user is signed in; the planner treats this as a
///   fatal precondition for loading
/// - Must be cheap; it is called before every fetch and save
pub trait SessionContext: Send + Sync {
    fn token(&self) -> Option<SessionToken>;
}
