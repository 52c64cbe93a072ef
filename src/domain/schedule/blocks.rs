//! Block Materializer - expands planned courses into weekly grid blocks.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{normalize, CourseOffer, CurriculumCourse};
use crate::domain::foundation::CourseCode;
use crate::domain::planner::PlannedSet;

/// Display duration used when a slot's length is not positive.
///
/// Keeps degenerate intervals visible and layout math free of zero divisors.
/// It is not a scheduling fact.
pub const FALLBACK_DURATION_HOURS: i32 = 2;

/// One planned occupancy of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    /// Stable per (code, offer index, slot index).
    pub id: String,
    pub code: CourseCode,
    /// 0 (Monday) to 4 (Friday).
    pub day_index: u8,
    pub start_time: i32,
    /// Always at least 1.
    pub duration_hours: i32,
}

impl ScheduleBlock {
    /// Hour at which the block stops occupying the grid.
    pub fn end_time(&self) -> i32 {
        self.start_time + self.duration_hours
    }
}

/// Builds the block id for a (code, offer, slot) triple.
pub fn block_id(code: &CourseCode, offer_index: usize, slot_index: usize) -> String {
    format!("{}-{}-{}", code, offer_index, slot_index)
}

/// Materializes blocks for every planned course in `curriculum`.
///
/// Every offer of a planned course contributes; selections are ignored.
/// Weekend slots are left off the grid. Blocks are not deduplicated, so two
/// offers meeting at the same time render as overlapping blocks.
pub fn materialize(curriculum: &[CurriculumCourse], planned: &PlannedSet) -> Vec<ScheduleBlock> {
    expand(curriculum, planned, |course| course.offers.iter().enumerate().collect())
}

/// Like [`materialize`], but a selected section narrows its course to that
/// offer (see [`PlannedSet::narrow_offers`]).
///
/// Ids keep the offer's position in the full offer list, so selecting a
/// section never renames the blocks that remain.
pub fn materialize_selected(curriculum: &[CurriculumCourse], planned: &PlannedSet) -> Vec<ScheduleBlock> {
    expand(curriculum, planned, |course| planned.narrow_offers(course))
}

fn expand<'a, F>(curriculum: &'a [CurriculumCourse], planned: &PlannedSet, offers_of: F) -> Vec<ScheduleBlock>
where
    F: Fn(&'a CurriculumCourse) -> Vec<(usize, &'a CourseOffer)>,
{
    let mut blocks = Vec::new();

    for course in curriculum.iter().filter(|c| planned.contains(c.code.as_str())) {
        for (offer_index, offer) in offers_of(course) {
            for (slot_index, slot) in normalize(Some(offer)).iter().enumerate() {
                if !slot.weekday.is_school_day() {
                    continue;
                }
                let duration = slot.duration_hours();
                blocks.push(ScheduleBlock {
                    id: block_id(&course.code, offer_index, slot_index),
                    code: course.code.clone(),
                    day_index: slot.weekday.index(),
                    start_time: slot.start_hour,
                    duration_hours: if duration > 0 {
                        duration
                    } else {
                        FALLBACK_DURATION_HOURS
                    },
                });
            }
        }
    }

    blocks
}
