//! PlanSignature - canonical fingerprint of a planned set.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::planned_set::PlannedSet;
use crate::domain::foundation::CourseCode;

/// Canonical serialization of `(sorted codes, sorted code -> section)`.
///
/// Used only for change detection; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlanSignature(String);

impl PlanSignature {
    /// Computes the signature of `plan`.
    pub fn of(plan: &PlannedSet) -> Self {
        let codes: Vec<Value> = plan.codes().map(|c| Value::from(c.as_str())).collect();
        let selections: Vec<Value> = plan
            .selections()
            .iter()
            .map(|(code, section)| Value::from(vec![code.as_str(), section.as_str()]))
            .collect();

        let mut canonical = Map::new();
        canonical.insert("codes".to_string(), Value::Array(codes));
        canonical.insert("selections".to_string(), Value::Array(selections));
        Self(Value::Object(canonical).to_string())
    }

    /// Signature of a plan holding exactly `codes` with no selections.
    pub fn of_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let plan = PlannedSet::from_codes(
            codes
                .into_iter()
                .filter_map(|c| CourseCode::new(c.as_ref()).ok()),
        );
        Self::of(&plan)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
