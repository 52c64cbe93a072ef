//! Planner module - the editable plan and the remote document it syncs with.
//!
//! - `errors` - `PlannerError`
//! - `planned_set` - `PlannedSet` with toggle/select/clear
//! - `signature` - `PlanSignature` for change detection
//! - `snapshot` - `PlannerSnapshot`, the opaque remote document
//! - `status` - `PlannerStatus` lifecycle state machine

mod errors;
mod planned_set;
mod signature;
mod snapshot;
mod status;

pub use errors::PlannerError;
pub use planned_set::PlannedSet;
pub use signature::PlanSignature;
pub use snapshot::{PlannerSnapshot, CURRICULUM_FIELD, PLANNED_CODES_FIELD};
pub use status::PlannerStatus;
