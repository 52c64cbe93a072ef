//! Planner store adapters.
//!
//! Implementations of the `PlannerStore` port:
//!
//! - `http` - Production REST implementation over reqwest
//! - `in_memory` - Test/dev implementation with failure injection

mod http;
mod in_memory;

pub use http::{HttpPlannerStore, HttpStoreConfig};
pub use in_memory::InMemoryPlannerStore;
