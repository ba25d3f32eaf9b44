//! Core domain logic for daily flow.
//!
//! This crate contains the pure, I/O-free parts:
//! - Line format: parsing and formatting `key:: [time ]text[ (time)]` entries
//! - Tags: routing an inline `#tag` to a configured log key
//! - Document: append/update/remove/reorder over a note's full text
//! - Habits and configuration records consumed by the above

pub mod config;
pub mod document;
pub mod habit;
pub mod line_format;
pub mod tags;
pub mod types;

pub use config::{HabitConfig, HabitKind, LogKeyConfig, Settings};
pub use habit::{HabitError, HabitValue};
pub use line_format::{
    EventRecord, canonical_time, format_event_line, is_event_line, is_primary_event_line,
    normalize_key, parse_event_line,
};
pub use tags::{TagResolution, resolve_tag};
pub use types::{DateKey, ValidationError};
