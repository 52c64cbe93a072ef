//! PlannedSet - the student's current selection of courses and sections.
//!
//! Only the plan state manager mutates a `PlannedSet`; views receive it by
//! shared reference.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::signature::PlanSignature;
use crate::domain::catalog::{CourseOffer, CurriculumCourse};
use crate::domain::foundation::CourseCode;

/// Planned course codes plus the chosen section per code.
///
/// A code without a selection means "no specific section chosen".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSet {
    codes: BTreeSet<CourseCode>,
    selections: BTreeMap<CourseCode, String>,
}

impl PlannedSet {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a plan containing `codes`, without section selections.
    pub fn from_codes(codes: impl IntoIterator<Item = CourseCode>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
            selections: BTreeMap::new(),
        }
    }

    /// True if `code` is planned.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Planned codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &CourseCode> {
        self.codes.iter()
    }

    /// Selected section for `code`, if any.
    pub fn selection(&self, code: &str) -> Option<&str> {
        self.selections.get(code).map(String::as_str)
    }

    /// All section selections, sorted by code.
    pub fn selections(&self) -> &BTreeMap<CourseCode, String> {
        &self.selections
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Flips membership of `code`.
    ///
    /// Toggling on with a section records it, replacing any previous
    /// selection. Toggling off clears the selection. Returns whether the code
    /// is planned afterwards.
    pub fn toggle(&mut self, code: CourseCode, section: Option<&str>) -> bool {
        if self.codes.remove(&code) {
            self.selections.remove(&code);
            return false;
        }
        if let Some(section) = section {
            self.selections.insert(code.clone(), section.to_string());
        }
        self.codes.insert(code);
        true
    }

    /// Records `section` as the chosen offer for `code`, planning it if needed.
    pub fn select(&mut self, code: CourseCode, section: impl Into<String>) {
        self.selections.insert(code.clone(), section.into());
        self.codes.insert(code);
    }

    /// Removes every code and selection.
    pub fn clear(&mut self) {
        self.codes.clear();
        self.selections.clear();
    }

    /// Sorted planned codes as plain strings, the persisted `planned_codes` shape.
    pub fn code_list(&self) -> Vec<String> {
        self.codes.iter().map(|c| c.as_str().to_string()).collect()
    }

    /// Canonical fingerprint used for change detection.
    pub fn signature(&self) -> PlanSignature {
        PlanSignature::of(self)
    }

    /// Offers of `course` that should reach the weekly grid, each with its
    /// index in `course.offers`.
    ///
    /// With a selection that matches a section, only that section. Without a
    /// selection, or when the selected section no longer exists, every offer.
    /// Indices are the original ones so block ids do not shift on selection.
    pub fn narrow_offers<'a>(&self, course: &'a CurriculumCourse) -> Vec<(usize, &'a CourseOffer)> {
        let all = course.offers.iter().enumerate();
        let Some(selected) = self.selection(course.code.as_str()) else {
            return all.collect();
        };
        let matching: Vec<(usize, &CourseOffer)> = all
            .clone()
            .filter(|(_, offer)| offer.section == selected)
            .collect();
        if matching.is_empty() {
            all.collect()
        } else {
            matching
        }
    }
}
