//! StateMachine - checked transitions for lifecycle enums.
//!
//! Gives lifecycle statuses (such as the planner's load/save status) one
//! interface for checking and performing transitions.

use super::ValidationError;

/// A status enum with an explicit transition table.
///
/// Implementors list their legal transitions; `transition_to` and
/// `is_terminal` come for free.
///
/// # Example
///
/// ```ignore
/// let next = PlannerStatus::Ready.transition_to(PlannerStatus::Saving)?;
/// assert_eq!(next, PlannerStatus::Saving);
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// States reachable in one step from `self`.
    fn valid_transitions(&self) -> Vec<Self>;

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns `target` if the table allows it, a validation error otherwise.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// True when no transition leaves `self`.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
