//! Entry-level edits over a whole note.
//!
//! Every function takes the full note text and returns the full new text.
//! Lines are split on `\n` only, so joining them back reproduces the input
//! byte for byte; a `\r` stays attached to its line slot. Lines that are not
//! part of an operation are never rewritten, and bad indices degrade to
//! returning the content unchanged.
//!
//! Indices stay valid across [`update_entry`] and [`reorder_entries`] (line
//! count is preserved) but not across [`append_entry`] or [`remove_entry`].

use std::borrow::Cow;

use chrono::NaiveTime;

use crate::line_format::{EventRecord, format_event_line, is_primary_event_line, parse_event_line};

/// Number of lines, counting a trailing empty line after a final newline.
pub fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// All event lines in ascending line order.
pub fn list_events(content: &str) -> Vec<EventRecord> {
    content
        .split('\n')
        .enumerate()
        .filter_map(|(index, line)| parse_event_line(line, index))
        .collect()
}

/// Appends a formatted entry as a new last line.
///
/// The new entry's index is `line_count(content)`.
pub fn append_entry(
    content: &str,
    key: &str,
    entry_time: Option<&str>,
    text: &str,
    recorded_time: Option<&str>,
) -> String {
    let line = format_event_line(key, entry_time, text, recorded_time);
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };

    let mut out = String::with_capacity(content.len() + newline.len() + line.len());
    out.push_str(content);
    out.push_str(newline);
    out.push_str(&line);
    out
}

/// Appends an entry stamped with `now` as its recorded time.
pub fn append_entry_stamped(
    content: &str,
    key: &str,
    entry_time: Option<&str>,
    text: &str,
    now: NaiveTime,
) -> String {
    let recorded = now.format("%H:%M").to_string();
    append_entry(content, key, entry_time, text, Some(&recorded))
}

/// Appends an entry without a recorded time.
pub fn append_entry_unstamped(
    content: &str,
    key: &str,
    entry_time: Option<&str>,
    text: &str,
) -> String {
    append_entry(content, key, entry_time, text, None)
}

/// Replaces the line at `line_index`.
///
/// Line breaks inside `new_line` are flattened to spaces so the line count
/// cannot change.
pub fn update_entry(content: &str, line_index: usize, new_line: &str) -> String {
    let mut lines: Vec<Cow<'_, str>> = content.split('\n').map(Cow::Borrowed).collect();
    let Some(slot) = lines.get_mut(line_index) else {
        tracing::debug!(line_index, "update target out of range, leaving note unchanged");
        return content.to_string();
    };

    let (_, ending) = split_cr(slot);
    let replacement = format!("{}{ending}", new_line.replace(['\r', '\n'], " "));
    *slot = Cow::Owned(replacement);
    lines.join("\n")
}

/// Deletes the line at `line_index`, shifting later lines up by one.
pub fn remove_entry(content: &str, line_index: usize) -> String {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if line_index >= lines.len() {
        tracing::debug!(line_index, "remove target out of range, leaving note unchanged");
        return content.to_string();
    }
    lines.remove(line_index);
    lines.join("\n")
}

/// Moves the event at `source` to the position of the event at `dest`.
///
/// Only primary event lines take part. Their contents are permuted across
/// the fixed set of line slots they occupy, so non-event lines (and lenient
/// event lines such as headings with a key) never move and the line count
/// never changes. Moving back with the indices swapped restores the note.
pub fn reorder_entries(content: &str, source: usize, dest: usize) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let slots: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_primary_event_line(line))
        .map(|(index, _)| index)
        .collect();

    let src_pos = slots.iter().position(|&slot| slot == source);
    let dest_pos = slots.iter().position(|&slot| slot == dest);
    let (Some(src_pos), Some(dest_pos)) = (src_pos, dest_pos) else {
        tracing::debug!(source, dest, "reorder endpoint is not an event line, leaving note unchanged");
        return content.to_string();
    };
    if src_pos == dest_pos {
        return content.to_string();
    }

    let mut texts: Vec<&str> = slots.iter().map(|&slot| split_cr(lines[slot]).0).collect();
    let moved = texts.remove(src_pos);
    texts.insert(dest_pos, moved);

    let mut out: Vec<Cow<'_, str>> = lines.iter().map(|line| Cow::Borrowed(*line)).collect();
    for (&slot, text) in slots.iter().zip(texts) {
        let (_, ending) = split_cr(lines[slot]);
        out[slot] = Cow::Owned(format!("{text}{ending}"));
    }
    out.join("\n")
}

/// Splits a trailing `\r` off a line.
fn split_cr(line: &str) -> (&str, &str) {
    line.strip_suffix('\r')
        .map_or((line, ""), |text| (text, "\r"))
}
