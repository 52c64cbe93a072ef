//! Planner application service.
//!
//! - `manager` - `PlanStateManager`, load/edit/save with debounced autosave
//! - `view` - `PlanView` and `AutosaveState`, derived per read

mod manager;
mod view;

pub use manager::PlanStateManager;
pub use view::{AutosaveState, PlanView};
