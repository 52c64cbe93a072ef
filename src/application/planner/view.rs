//! PlanView - everything a renderer needs, derived from the current plan.

use serde::Serialize;

use crate::domain::planner::{PlanSignature, PlannedSet, PlannerSnapshot, PlannerStatus};
use crate::domain::schedule::{detect_conflicts, group_by_day, materialize_selected, Conflict, DayGroups, ScheduleBlock};

/// Where the debounced autosave currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum AutosaveState {
    /// Nothing loaded yet.
    NotLoaded,
    /// Live plan matches the last saved plan.
    UpToDate,
    /// Autosave is turned off; call `save_planner` explicitly.
    Disabled,
    /// Unsaved changes are held back until the conflicts are resolved.
    BlockedByConflicts { conflicts: usize },
    /// A debounced save is waiting for its window to pass.
    Scheduled,
    /// Changes arrived during a network operation; they are rescheduled once
    /// it resolves.
    Deferred,
    Saving,
    /// The last save failed. The next edit, or an explicit save, retries.
    Failed,
    /// Unsaved changes with nothing scheduled.
    Unsaved,
}

/// Derived, read-only view of the planner.
///
/// Computing a view has no side effects: rendering never schedules a save.
#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    pub status: PlannerStatus,
    pub day_groups: DayGroups,
    pub blocks: Vec<ScheduleBlock>,
    pub conflicts: Vec<Conflict>,
    pub signature: PlanSignature,
    pub has_unsaved_changes: bool,
    pub autosave: AutosaveState,
    pub last_error: Option<String>,
}

/// Blocks of the planned courses, honouring offer selections.
pub(crate) fn planned_blocks(snapshot: &PlannerSnapshot, planned: &PlannedSet) -> Vec<ScheduleBlock> {
    materialize_selected(snapshot.curriculum(), planned)
}

/// Grid data derived from a loaded snapshot.
pub(crate) struct Derived {
    pub day_groups: DayGroups,
    pub blocks: Vec<ScheduleBlock>,
    pub conflicts: Vec<Conflict>,
}

impl Derived {
    pub fn compute(snapshot: Option<&PlannerSnapshot>, planned: &PlannedSet) -> Self {
        match snapshot {
            Some(snapshot) => {
                let blocks = planned_blocks(snapshot, planned);
                let conflicts = detect_conflicts(&blocks);
                Self {
                    day_groups: group_by_day(snapshot.curriculum(), planned),
                    blocks,
                    conflicts,
                }
            }
            None => Self {
                day_groups: group_by_day(&[], planned),
                blocks: Vec::new(),
                conflicts: Vec::new(),
            },
        }
    }
}
