//! PlannerSnapshot - the remote planner document as last seen by the client.
//!
//! The document is opaque except for `curriculum` (read) and `planned_codes`
//! (read and written). Every other field is carried along untouched so a save
//! never drops data the client does not understand.

use serde_json::{Map, Value};

use super::planned_set::PlannedSet;
use super::signature::PlanSignature;
use crate::domain::catalog::{fields, parse_curriculum, CurriculumCourse};
use crate::domain::foundation::{CourseCode, ValidationError};

/// Key of the curriculum array in the planner document.
pub const CURRICULUM_FIELD: &str = "curriculum";

/// Key of the persisted planned codes in the planner document.
pub const PLANNED_CODES_FIELD: &str = "planned_codes";

/// Parsed view over a planner document plus the raw document itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSnapshot {
    document: Map<String, Value>,
    curriculum: Vec<CurriculumCourse>,
    planned_codes: Vec<CourseCode>,
}

impl PlannerSnapshot {
    /// Parses a planner document.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidFormat` when the document is not a
    /// JSON object. Malformed content inside the object never fails.
    pub fn from_payload(payload: Value) -> Result<Self, ValidationError> {
        let Value::Object(document) = payload else {
            return Err(ValidationError::invalid_format(
                "planner_payload",
                "expected a JSON object",
            ));
        };

        let curriculum = document
            .get(CURRICULUM_FIELD)
            .map(parse_curriculum)
            .unwrap_or_default();
        let planned_codes = document
            .get(PLANNED_CODES_FIELD)
            .map(fields::as_text_list)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|code| CourseCode::new(code).ok())
            .collect();

        Ok(Self {
            document,
            curriculum,
            planned_codes,
        })
    }

    pub fn curriculum(&self) -> &[CurriculumCourse] {
        &self.curriculum
    }

    /// Planned codes as saved on the server.
    pub fn planned_codes(&self) -> &[CourseCode] {
        &self.planned_codes
    }

    /// Looks up a curriculum course by code.
    pub fn course(&self, code: &str) -> Option<&CurriculumCourse> {
        self.curriculum.iter().find(|c| c.code.as_str() == code)
    }

    /// The plan to start editing from: saved codes plus every course the
    /// student is enrolled in this term that has at least one offer.
    pub fn initial_plan(&self) -> PlannedSet {
        let enrolled = self
            .curriculum
            .iter()
            .filter(|course| course.enrolled && course.is_offered())
            .map(|course| course.code.clone());
        PlannedSet::from_codes(self.planned_codes.iter().cloned().chain(enrolled))
    }

    /// Signature of what the server currently holds.
    pub fn saved_signature(&self) -> PlanSignature {
        PlanSignature::of_codes(self.planned_codes.iter())
    }

    /// The full document with `planned_codes` replaced by `plan`'s codes.
    pub fn to_payload(&self, plan: &PlannedSet) -> Value {
        let mut document = self.document.clone();
        document.insert(
            PLANNED_CODES_FIELD.to_string(),
            Value::from(plan.code_list()),
        );
        Value::Object(document)
    }
}
