//! Conflict Detector - finds overlapping blocks on the same weekday.
//!
//! # Algorithm
//!
//! Partition by weekday, sort each day by start time, then compare neighbours
//! only. For sorted intervals any overlap implies an overlap between some
//! adjacent pair, so the neighbour scan finds every day that has a conflict
//! in O(n log n).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::blocks::ScheduleBlock;

/// Two blocks on one weekday whose intervals overlap.
///
/// `block_a` starts no later than `block_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub weekday: u8,
    pub block_a: ScheduleBlock,
    pub block_b: ScheduleBlock,
}

impl Conflict {
    /// Number of overlapping hours.
    pub fn overlap_hours(&self) -> i32 {
        self.block_a.end_time().min(self.block_b.end_time()) - self.block_b.start_time
    }
}

/// Detects conflicts between adjacent blocks of each weekday.
///
/// Within a day blocks are ordered by `(start_time, id)`, so the result does
/// not depend on input order. Output is ordered by weekday, then by position.
pub fn detect_conflicts(blocks: &[ScheduleBlock]) -> Vec<Conflict> {
    let mut by_day: BTreeMap<u8, Vec<&ScheduleBlock>> = BTreeMap::new();
    for block in blocks {
        by_day.entry(block.day_index).or_default().push(block);
    }

    let mut conflicts = Vec::new();
    for (weekday, mut day_blocks) in by_day {
        day_blocks.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        for pair in day_blocks.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.start_time + a.duration_hours > b.start_time {
                conflicts.push(Conflict {
                    weekday,
                    block_a: a.clone(),
                    block_b: b.clone(),
                });
            }
        }
    }
    conflicts
}
