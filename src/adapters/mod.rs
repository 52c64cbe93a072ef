//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the planner to external systems:
//! - `session` - Session token sources
//! - `store` - Planner document stores (HTTP, in-memory)

pub mod session;
pub mod store;

pub use session::StaticSession;
pub use store::{HttpPlannerStore, HttpStoreConfig, InMemoryPlannerStore};
