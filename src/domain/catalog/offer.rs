//! Course offers (sections) and their weekly events.
//!
//! These are the strict internal shapes. Upstream records are loosely typed
//! and use inconsistent field names, so each type has a total `from_json`
//! constructor that maps anything unusable to `None` or an empty list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields;

const WEEKDAY_KEYS: &[&str] = &["day", "weekday", "day_of_week", "dayOfWeek", "dia"];
const START_KEYS: &[&str] = &["start_hour", "startHour", "start", "start_time", "startTime", "inicio"];
const END_KEYS: &[&str] = &["end_hour", "endHour", "end", "end_time", "endTime", "fim"];
const LOCATION_KEYS: &[&str] = &["location", "room", "sala", "local"];
const SECTION_KEYS: &[&str] = &["turma", "section", "label"];
const PROFESSOR_KEYS: &[&str] = &["professor", "professors", "professores", "docentes"];
const EVENT_KEYS: &[&str] = &["events", "eventos", "schedule"];

/// One recurring weekly occurrence of an offer, `[start_hour, end_hour)`.
///
/// Fields are kept as resolved from upstream; validity (weekday in range,
/// `end > start`) is decided by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OfferEvent {
    /// Monday-first weekday index as sent upstream.
    pub weekday: Option<i64>,
    pub start_hour: Option<i32>,
    pub end_hour: Option<i32>,
    pub location: Option<String>,
}

impl OfferEvent {
    /// Creates a fully-resolved event.
    pub fn new(weekday: i64, start_hour: i32, end_hour: i32) -> Self {
        Self {
            weekday: Some(weekday),
            start_hour: Some(start_hour),
            end_hour: Some(end_hour),
            location: None,
        }
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Parses one upstream event record. Non-objects yield an all-`None` event.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            weekday: fields::first(obj, WEEKDAY_KEYS).and_then(fields::as_integer),
            start_hour: fields::first(obj, START_KEYS).and_then(fields::as_hour),
            end_hour: fields::first(obj, END_KEYS).and_then(fields::as_hour),
            location: fields::first(obj, LOCATION_KEYS).and_then(fields::as_text),
        }
    }
}

/// One section of a course.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseOffer {
    /// Section label (turma). May be empty.
    pub section: String,
    pub professors: Vec<String>,
    pub events: Vec<OfferEvent>,
}

impl CourseOffer {
    /// Creates an offer with the given section label and no events.
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            ..Self::default()
        }
    }

    /// Appends an event.
    pub fn with_event(mut self, event: OfferEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Appends a professor name.
    pub fn with_professor(mut self, name: impl Into<String>) -> Self {
        self.professors.push(name.into());
        self
    }

    /// Parses one upstream offer record.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let events = fields::first(obj, EVENT_KEYS)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(OfferEvent::from_json).collect())
            .unwrap_or_default();

        Self {
            section: fields::first(obj, SECTION_KEYS)
                .and_then(fields::as_text)
                .unwrap_or_default(),
            professors: fields::first(obj, PROFESSOR_KEYS)
                .map(fields::as_text_list)
                .unwrap_or_default(),
            events,
        }
    }
}
