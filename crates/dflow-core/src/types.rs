//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The value is not a `YYYY-MM-DD` calendar date.
    #[error("invalid date key: {value} (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    /// The value is not an `H:MM` or `HH:MM` time.
    #[error("invalid time: {value} (expected HH:MM)")]
    InvalidTime { value: String },
}

/// Identifies one daily note.
///
/// Always rendered as `YYYY-MM-DD`; the journal layout derives folder names
/// from its year and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// The date key for the local calendar day.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The previous calendar day.
    #[must_use]
    pub fn prev(self) -> Self {
        self.offset(-1)
    }

    /// The next calendar day.
    #[must_use]
    pub fn next(self) -> Self {
        self.offset(1)
    }

    /// Shifts by a number of days, saturating at the calendar bounds.
    #[must_use]
    pub fn offset(self, days: i64) -> Self {
        Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map_or(self, Self)
    }

    /// Recovers a date key from a note file stem such as `2025-03-14`.
    ///
    /// Only an exact, strict match counts; `2025-3-14` or `2025-03-14 notes`
    /// yield `None`.
    pub fn from_note_name(stem: &str) -> Option<Self> {
        let strict = stem.len() == 10
            && stem.char_indices().all(|(i, c)| match i {
                4 | 7 => c == '-',
                _ => c.is_ascii_digit(),
            });
        if !strict {
            return None;
        }
        stem.parse().ok()
    }

    /// Four-digit year folder name.
    pub fn year_dir(self) -> String {
        format!("{:04}", self.0.year())
    }

    /// Two-digit month folder name.
    pub fn month_dir(self) -> String {
        format!("{:02}", self.0.month())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "date key" });
        }
        NaiveDate::parse_from_str(s, Self::FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for DateKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}
