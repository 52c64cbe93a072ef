//! Planner error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors surfaced by planner operations.
///
/// Messages from the remote store are kept verbatim so the caller can show
/// them as-is. Malformed offer data is never an error; it is dropped during
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    /// No session token; the user must sign in elsewhere.
    #[error("No active session")]
    NoSession,

    /// Loading the planner document failed. Recoverable via refresh.
    #[error("Failed to load planner: {0}")]
    FetchFailed(String),

    /// Saving the planner document failed. The local plan is kept.
    #[error("Failed to save planner: {0}")]
    SaveFailed(String),

    /// An edit or save was attempted before the first successful load.
    #[error("Planner has not been loaded yet")]
    NotLoaded,

    #[error("Invalid planner state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PlannerError {
    /// Creates a fetch failure with a message.
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::FetchFailed(message.into())
    }

    /// Creates a save failure with a message.
    pub fn save_failed(message: impl Into<String>) -> Self {
        Self::SaveFailed(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PlannerError::NoSession => ErrorCode::NoSession,
            PlannerError::FetchFailed(_) => ErrorCode::FetchFailed,
            PlannerError::SaveFailed(_) => ErrorCode::SaveFailed,
            PlannerError::NotLoaded => ErrorCode::PlannerNotLoaded,
            PlannerError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            PlannerError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }

    /// True if a user-initiated retry or refresh may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlannerError::FetchFailed(_) | PlannerError::SaveFailed(_))
    }
}

impl From<PlannerError> for DomainError {
    fn from(err: PlannerError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failed_keeps_message_verbatim() {
        let err = PlannerError::fetch_failed("Planner store returned 502: bad gateway");
        assert_eq!(
            err.to_string(),
            "Failed to load planner: Planner store returned 502: bad gateway"
        );
    }

    #[test]
    fn codes_match_variants() {
        assert_eq!(PlannerError::NoSession.code(), ErrorCode::NoSession);
        assert_eq!(PlannerError::save_failed("x").code(), ErrorCode::SaveFailed);
        assert_eq!(PlannerError::NotLoaded.code(), ErrorCode::PlannerNotLoaded);
    }

    #[test]
    fn only_network_failures_are_recoverable() {
        assert!(PlannerError::fetch_failed("x").is_recoverable());
        assert!(PlannerError::save_failed("x").is_recoverable());
        assert!(!PlannerError::NoSession.is_recoverable());
        assert!(!PlannerError::NotLoaded.is_recoverable());
    }

    #[test]
    fn converts_to_domain_error() {
        let err: DomainError = PlannerError::NoSession.into();
        assert_eq!(err.code, ErrorCode::NoSession);
        assert_eq!(err.to_string(), "[NO_SESSION] No active session");
    }
}
