//! PlannerStatus - load/save lifecycle of the plan state manager.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of the planner.
///
/// Local edits (toggle/select) do not change the status; only network
/// operations do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlannerStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Saving,
    Error,
}

impl PlannerStatus {
    /// True while a network operation is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, PlannerStatus::Loading | PlannerStatus::Saving)
    }
}

impl StateMachine for PlannerStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use PlannerStatus::*;
        match self {
            Idle => vec![Loading],
            Loading => vec![Ready, Error],
            Ready => vec![Loading, Saving],
            Saving => vec![Ready, Error],
            Error => vec![Loading, Saving],
        }
    }
}

impl fmt::Display for PlannerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlannerStatus::Idle => "idle",
            PlannerStatus::Loading => "loading",
            PlannerStatus::Ready => "ready",
            PlannerStatus::Saving => "saving",
            PlannerStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PlannerStatus::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(PlannerStatus::default(), Idle);
    }

    #[test]
    fn load_path_is_valid() {
        assert!(Idle.can_transition_to(&Loading));
        assert!(Loading.can_transition_to(&Ready));
        assert!(Loading.can_transition_to(&Error));
    }

    #[test]
    fn save_path_is_valid() {
        assert!(Ready.can_transition_to(&Saving));
        assert!(Saving.can_transition_to(&Ready));
        assert!(Saving.can_transition_to(&Error));
    }

    #[test]
    fn error_allows_refresh_and_retry() {
        assert!(Error.can_transition_to(&Loading));
        assert!(Error.can_transition_to(&Saving));
    }

    #[test]
    fn cannot_save_before_loading() {
        assert!(Idle.transition_to(Saving).is_err());
        assert!(Loading.transition_to(Saving).is_err());
    }

    #[test]
    fn cannot_start_second_save_while_saving() {
        assert!(!Saving.can_transition_to(&Saving));
    }

    #[test]
    fn no_status_is_terminal() {
        for status in [Idle, Loading, Ready, Saving, Error] {
            assert!(!status.is_terminal(), "{:?} should not be terminal", status);
        }
    }

    #[test]
    fn busy_only_during_network_operations() {
        assert!(Loading.is_busy());
        assert!(Saving.is_busy());
        assert!(!Ready.is_busy());
        assert!(!Error.is_busy());
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Saving).unwrap(), "\"saving\"");
    }
}
