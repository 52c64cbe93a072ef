//! Planner Store Port - Interface to the remote planner document.
//!
//! The store is an opaque key-value document service. The client reads the
//! whole document and writes the whole document back; there is no merge of
//! concurrent remote edits (last write wins).

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::SessionToken;

/// Errors that can occur while talking to the planner store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Session rejected by planner store")]
    Unauthorized,

    #[error("Planner store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid planner payload: {0}")]
    InvalidPayload(String),
}

impl StoreError {
    /// Creates a network error with a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}

/// Port for reading and writing the planner document.
///
/// # Contract
///
/// Implementations must:
/// - Return the document exactly as stored on `fetch`
/// - Persist the full payload on `save` and return the stored (possibly
///   server-normalized) document
/// - Never retry on their own
#[async_trait]
pub trait PlannerStore: Send + Sync {
    /// Fetch the planner document for the session's user.
    async fn fetch(&self, token: &SessionToken) -> Result<Value, StoreError>;

    /// Replace the planner document with `payload`.
    async fn save(&self, token: &SessionToken, payload: &Value) -> Result<Value, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_includes_code_and_body() {
        let err = StoreError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Planner store returned 503: maintenance");
    }

    #[test]
    fn timeout_error_mentions_duration() {
        let err = StoreError::Timeout { timeout_secs: 30 };
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn planner_store_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn PlannerStore) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn PlannerStore>>();
    }
}
