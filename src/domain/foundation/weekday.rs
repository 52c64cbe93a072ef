//! Weekday enum using the Monday-first indexing of the upstream catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Day of the week, indexed 0 (Monday) through 6 (Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in index order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Resolves an upstream index. Anything outside `0..=6` is rejected.
    pub fn from_index(index: i64) -> Result<Self, ValidationError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| ValidationError::out_of_range("weekday", 0, 6, index))
    }

    /// Monday-first index, 0..=6.
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// True for Monday through Friday, the days shown on the weekly grid.
    pub fn is_school_day(&self) -> bool {
        self.index() <= 4
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        };
        write!(f, "{}", s)
    }
}
