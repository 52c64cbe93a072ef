//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the planner core and the outside world. Adapters implement these ports.
//!
//! - `PlannerStore` - remote planner document (fetch/save)
//! - `SessionContext` - current session token

mod planner_store;
mod session_context;

pub use planner_store::{PlannerStore, StoreError};
pub use session_context::SessionContext;
