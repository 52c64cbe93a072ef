//! Domain layer containing the planning and scheduling logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (course codes, weekdays, session token, errors)
//! - `catalog` - Curriculum courses, offers, and the offer normalizer
//! - `planner` - The editable plan, its signature, and the remote snapshot
//! - `schedule` - Day grouping, grid blocks, and conflict detection

pub mod catalog;
pub mod foundation;
pub mod planner;
pub mod schedule;
