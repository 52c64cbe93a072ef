//! Curriculum courses as delivered in the planner snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields;
use super::offer::CourseOffer;
use crate::domain::foundation::CourseCode;

const CODE_KEYS: &[&str] = &["code", "codigo"];
const NAME_KEYS: &[&str] = &["name", "nome"];
const OFFER_KEYS: &[&str] = &["offers", "oferecimentos"];
const ENROLLED_KEYS: &[&str] = &["enrolled", "currently_enrolled", "cursando"];

/// A course in the student's curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumCourse {
    pub code: CourseCode,
    pub name: String,
    /// Empty means "not offered this term".
    pub offers: Vec<CourseOffer>,
    /// Flagged by the snapshot as currently enrolled this term.
    pub enrolled: bool,
}

impl CurriculumCourse {
    /// Creates a course with no offers.
    pub fn new(code: CourseCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            offers: Vec::new(),
            enrolled: false,
        }
    }

    /// Appends an offer.
    pub fn with_offer(mut self, offer: CourseOffer) -> Self {
        self.offers.push(offer);
        self
    }

    /// Marks the course as currently enrolled.
    pub fn enrolled(mut self) -> Self {
        self.enrolled = true;
        self
    }

    /// True when at least one section is offered this term.
    pub fn is_offered(&self) -> bool {
        !self.offers.is_empty()
    }

    /// Parses one upstream course record. Returns `None` without a usable code.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let code = fields::first(obj, CODE_KEYS)
            .and_then(fields::as_text)
            .and_then(|code| CourseCode::new(code).ok())?;
        let offers = fields::first(obj, OFFER_KEYS)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(CourseOffer::from_json).collect())
            .unwrap_or_default();

        Some(Self {
            code,
            name: fields::first(obj, NAME_KEYS)
                .and_then(fields::as_text)
                .unwrap_or_default(),
            offers,
            enrolled: fields::first(obj, ENROLLED_KEYS)
                .and_then(fields::as_flag)
                .unwrap_or(false),
        })
    }
}

/// Parses a curriculum array, skipping records without a usable code.
///
/// A non-array value is an empty curriculum.
pub fn parse_curriculum(value: &Value) -> Vec<CurriculumCourse> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    let courses: Vec<CurriculumCourse> = items.iter().filter_map(CurriculumCourse::from_json).collect();
    if courses.len() < items.len() {
        tracing::debug!(
            skipped = items.len() - courses.len(),
            "Skipped curriculum records without a course code"
        );
    }
    courses
}
