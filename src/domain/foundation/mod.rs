//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, enums, and error types that form the vocabulary
//! of the course planner.

mod auth;
mod course_code;
mod errors;
mod state_machine;
mod timestamp;
mod weekday;

pub use auth::SessionToken;
pub use course_code::CourseCode;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
pub use weekday::Weekday;
