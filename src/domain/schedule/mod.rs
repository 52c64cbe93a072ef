//! Schedule module - pure views derived from the curriculum and the plan.
//!
//! - `day_grouping` - list buckets per weekday
//! - `blocks` - weekly grid blocks for planned courses
//! - `conflicts` - overlap detection over grid blocks
//!
//! All functions are pure and cheap enough to recompute on every change.

mod blocks;
mod conflicts;
mod day_grouping;

pub use blocks::{block_id, materialize, materialize_selected, ScheduleBlock, FALLBACK_DURATION_HOURS};
pub use conflicts::{detect_conflicts, Conflict};
pub use day_grouping::{group_by_day, CourseEntry, DayBucket, DayGroups};
