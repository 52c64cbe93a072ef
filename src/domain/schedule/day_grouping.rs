//! Day Grouping - buckets curriculum courses by weekday for list display.
//!
//! This is a display index only. It is not a scheduling source of truth and
//! never looks at section selections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::catalog::{normalize, CurriculumCourse};
use crate::domain::foundation::{CourseCode, Weekday};
use crate::domain::planner::PlannedSet;

/// List bucket: one per school day, plus `Other` for weekend, unscheduled
/// and unoffered courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBucket {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Other,
}

impl DayBucket {
    /// Every bucket in display order.
    pub const ALL: [DayBucket; 6] = [
        DayBucket::Monday,
        DayBucket::Tuesday,
        DayBucket::Wednesday,
        DayBucket::Thursday,
        DayBucket::Friday,
        DayBucket::Other,
    ];
}

impl From<Weekday> for DayBucket {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => DayBucket::Monday,
            Weekday::Tuesday => DayBucket::Tuesday,
            Weekday::Wednesday => DayBucket::Wednesday,
            Weekday::Thursday => DayBucket::Thursday,
            Weekday::Friday => DayBucket::Friday,
            Weekday::Saturday | Weekday::Sunday => DayBucket::Other,
        }
    }
}

impl fmt::Display for DayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayBucket::Monday => "Mon",
            DayBucket::Tuesday => "Tue",
            DayBucket::Wednesday => "Wed",
            DayBucket::Thursday => "Thu",
            DayBucket::Friday => "Fri",
            DayBucket::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// One placement of a course in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEntry {
    pub code: CourseCode,
    pub planned: bool,
}

/// Buckets → entries, with every bucket present (possibly empty).
pub type DayGroups = BTreeMap<DayBucket, Vec<CourseEntry>>;

/// Groups every curriculum course by the weekdays its offers meet on.
///
/// A course without offers, or with an offer that has no valid slot, lands in
/// `Other`. Placements are merged per course: a course appears at most once
/// per bucket even when several of its offers meet that day (or several
/// offers lack slots), so list views never show the same code twice in a
/// bucket. Within a bucket, entries follow curriculum order.
pub fn group_by_day(curriculum: &[CurriculumCourse], planned: &PlannedSet) -> DayGroups {
    let mut groups: DayGroups = DayBucket::ALL.iter().map(|b| (*b, Vec::new())).collect();

    for course in curriculum {
        let mut buckets: Vec<DayBucket> = Vec::new();
        if course.offers.is_empty() {
            buckets.push(DayBucket::Other);
        }
        for offer in &course.offers {
            let slots = normalize(Some(offer));
            if slots.is_empty() {
                buckets.push(DayBucket::Other);
            }
            buckets.extend(slots.iter().map(|slot| DayBucket::from(slot.weekday)));
        }
        buckets.sort();
        buckets.dedup();

        let entry = CourseEntry {
            code: course.code.clone(),
            planned: planned.contains(course.code.as_str()),
        };
        for bucket in buckets {
            groups.entry(bucket).or_default().push(entry.clone());
        }
    }

    groups
}
