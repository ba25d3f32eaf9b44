//! Line format codec for log entries.
//!
//! An event line has the shape
//!
//! ```text
//! <key>:: [<entryTime> ]<text>[ (<recordedTime>)]
//! ```
//!
//! where both times are `H:MM` or `HH:MM`. Any other line is inert prose and
//! parses to `None`. Everything here is pure: no I/O and no state.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::ValidationError;

/// Delimiter between key and body.
pub const DELIMITER: &str = "::";

/// Trailing `(HH:MM)` stamp, with any whitespace in front of it.
static RECORDED_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(([0-9]{1,2}:[0-9]{2})\)$").unwrap());

/// Leading time, optionally parenthesised, followed by a separator or the end of text.
///
/// A `-` or `.` separator must itself be followed by whitespace or the end,
/// so text such as `-5` or `.NET` keeps its first character.
static ENTRY_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?([0-9]{1,2}:[0-9]{2})\)?(?:\s*[-.](?:\s+|$)|\s+|$)").unwrap()
});

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?([0-9]{1,2}):([0-9]{2})\)?$").unwrap());

/// One parsed log entry.
///
/// Records are recomputed from note text on every read and never persisted
/// on their own. `line_index` is only meaningful for the content it was
/// parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Zero-based line index at parse time.
    pub line_index: usize,
    /// The source line exactly as it appeared.
    pub raw_line: String,
    /// Normalized category key, without the trailing `::`.
    pub key: String,
    /// Everything after the delimiter, trimmed. Still carries the time tokens.
    pub body: String,
    /// When the event happened (leading time token).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<String>,
    /// When the entry was logged (trailing parenthesised token).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_time: Option<String>,
    /// Body without either time token. Inline `#tag` and `[[link]]` markup is kept.
    pub text: String,
}

impl EventRecord {
    /// Formats the record back into a line.
    pub fn to_line(&self) -> String {
        format_event_line(
            &self.key,
            self.entry_time.as_deref(),
            &self.text,
            self.recorded_time.as_deref(),
        )
    }
}

/// Parses a single line into an event record.
///
/// Total over all input: lines without `::`, or whose key would be empty,
/// yield `None`.
pub fn parse_event_line(line: &str, index: usize) -> Option<EventRecord> {
    let trimmed = line.trim();
    let (key, rest) = match_primary(trimmed).or_else(|| match_lenient(trimmed))?;
    let key = normalize_key(key);
    if key.is_empty() {
        return None;
    }

    let body = rest.trim();
    let (entry_time, text, recorded_time) = split_body(body);

    Some(EventRecord {
        line_index: index,
        raw_line: line.to_string(),
        key: key.to_string(),
        body: body.to_string(),
        entry_time,
        recorded_time,
        text,
    })
}

/// Whether the line parses as an event under the full (lenient) grammar.
pub fn is_event_line(line: &str) -> bool {
    parse_event_line(line, 0).is_some()
}

/// Whether the line is an event in its primary, anchored form.
///
/// Stricter than [`is_event_line`]: a line whose key is preceded by heading,
/// list or quote markup is not primary. Reordering only moves primary lines.
pub fn is_primary_event_line(line: &str) -> bool {
    match_primary(line.trim()).is_some()
}

/// Formats a log entry line.
///
/// Empty optional parts are left out without doubling spaces. The key may be
/// passed with or without its trailing `::`.
pub fn format_event_line(
    key: &str,
    entry_time: Option<&str>,
    text: &str,
    recorded_time: Option<&str>,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);
    if let Some(time) = entry_time.map(str::trim).filter(|t| !t.is_empty()) {
        parts.push(time.to_string());
    }
    let text = text.trim();
    if !text.is_empty() {
        parts.push(text.to_string());
    }
    if let Some(time) = recorded_time.map(str::trim).filter(|t| !t.is_empty()) {
        parts.push(format!("({time})"));
    }

    let line = format!("{}{DELIMITER} {}", normalize_key(key), parts.join(" "));
    line.trim().to_string()
}

/// Strips trailing `::` delimiters (and the whitespace before them) from a key.
///
/// Repeated application gives the same result, so keys coming from
/// configuration (`"dl::"`) and from parsing (`"dl"`) compare equal.
pub fn normalize_key(key: &str) -> &str {
    let mut key = key.trim();
    while let Some(stripped) = key.strip_suffix(DELIMITER) {
        key = stripped.trim_end();
    }
    key
}

/// Validates a user-supplied time and zero-pads it (`7:50` becomes `07:50`).
///
/// Unlike parsing, this rejects out-of-range values such as `24:00`.
pub fn canonical_time(input: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidTime {
        value: input.to_string(),
    };
    let caps = TIME_RE.captures(input.trim()).ok_or_else(invalid)?;
    let hours: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minutes: u32 = caps[2].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok(format!("{hours:02}:{minutes:02}"))
}

/// Anchored form: the key is everything before the first delimiter.
fn match_primary(line: &str) -> Option<(&str, &str)> {
    let (left, rest) = line.split_once(DELIMITER)?;
    let key = left.trim();
    if key.is_empty() || opens_with_block_markup(line) {
        return None;
    }
    Some((key, rest))
}

/// Fallback form: the key is the last word before the first delimiter.
fn match_lenient(line: &str) -> Option<(&str, &str)> {
    let (left, rest) = line.split_once(DELIMITER)?;
    let key = left.split_whitespace().next_back()?;
    Some((key, rest))
}

/// Heading (`## `), bullet (`- `, `* `, `+ `), ordered item (`1. `) or quote (`>`).
fn opens_with_block_markup(line: &str) -> bool {
    if line.starts_with('>') {
        return true;
    }

    let hashes = line.len() - line.trim_start_matches('#').len();
    if hashes > 0 {
        return line[hashes..].starts_with(char::is_whitespace);
    }

    let mut chars = line.chars();
    match chars.next() {
        Some('-' | '*' | '+') => chars.next().is_some_and(char::is_whitespace),
        Some(c) if c.is_ascii_digit() => {
            let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
            let mut rest = rest.chars();
            matches!(rest.next(), Some('.' | ')')) && rest.next().is_some_and(char::is_whitespace)
        }
        _ => false,
    }
}

/// Splits a trimmed body into `(entry_time, text, recorded_time)`.
fn split_body(body: &str) -> (Option<String>, String, Option<String>) {
    let mut working = body;
    let mut recorded_time = None;
    if let Some(caps) = RECORDED_TIME_RE.captures(working) {
        recorded_time = Some(caps[1].to_string());
        let start = caps.get(0).map_or(working.len(), |m| m.start());
        working = &working[..start];
    }

    let mut entry_time = None;
    if let Some(caps) = ENTRY_TIME_RE.captures(working) {
        entry_time = Some(caps[1].to_string());
        let end = caps.get(0).map_or(0, |m| m.end());
        working = &working[end..];
    }

    (entry_time, working.trim().to_string(), recorded_time)
}
