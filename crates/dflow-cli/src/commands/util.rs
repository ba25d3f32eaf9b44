//! Shared utilities for CLI commands.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use dflow_core::DateKey;
use regex::Regex;

/// `+N` or `-N` day offsets.
static DAY_OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([+-])(\d+)$").unwrap());

/// Conservative bound for day offsets (~1000 years).
const MAX_DAY_OFFSET: i64 = 1000 * 366;

/// Parse a `--date` value relative to `today`.
///
/// Supports:
/// - Named days: "today", "yesterday", "tomorrow"
/// - Offsets: "+1", "-7"
/// - Dates: "2025-03-14"
/// - Note files: "2025-03-14.md", "journal/2025/03/2025-03-14.md"
pub fn parse_date(s: &str, today: DateKey) -> Result<DateKey> {
    let s = s.trim();
    match s.to_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(today.prev()),
        "tomorrow" => return Ok(today.next()),
        _ => {}
    }

    if let Some(caps) = DAY_OFFSET_RE.captures(s) {
        let n: i64 = caps[2].parse().context("failed to parse day offset")?;
        if n > MAX_DAY_OFFSET {
            bail!("Day offset too large: {s}");
        }
        let days = if &caps[1] == "-" { -n } else { n };
        return Ok(today.offset(days));
    }

    if let Some(date) = note_date(s) {
        return Ok(date);
    }

    s.parse::<DateKey>().with_context(|| {
        format!("Invalid date: {s}. Use YYYY-MM-DD, today, yesterday, tomorrow or +N/-N")
    })
}

/// The date a daily note's file name stands for.
fn note_date(s: &str) -> Option<DateKey> {
    let stem = Path::new(s).file_stem()?.to_str()?;
    DateKey::from_note_name(stem)
}

/// Resolves the optional `--date` flag, defaulting to today.
pub fn resolve_date(flag: Option<&str>, today: DateKey) -> Result<DateKey> {
    flag.map_or(Ok(today), |s| parse_date(s, today))
}

/// Joins a free-text argument list the way the shell split it.
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}
