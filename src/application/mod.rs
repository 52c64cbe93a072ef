//! Application layer - services that orchestrate domain operations over ports.

pub mod planner;

pub use planner::{AutosaveState, PlanStateManager, PlanView};
