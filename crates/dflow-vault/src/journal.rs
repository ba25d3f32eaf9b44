//! User actions against the journal.
//!
//! Each action resolves the day's note, re-reads it, runs one engine
//! function and writes the result back. Line indices come from the latest
//! [`Journal::day`] view; when the note changed underneath and an index no
//! longer points at an event, the action reports [`Outcome::Unchanged`].

use std::path::PathBuf;

use chrono::NaiveTime;
use dflow_core::document::{self, line_count};
use dflow_core::{
    DateKey, EventRecord, HabitKind, HabitValue, Settings, canonical_time, format_event_line,
    parse_event_line, resolve_tag,
};
use serde::{Serialize, Serializer};

use crate::{FrontmatterStore, NoteStore, VaultError};

/// Whether an action changed the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Applied,
    Unchanged,
}

/// A new log entry as requested by the user.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    /// Requested key; `None` uses the first configured log key.
    pub key: Option<String>,
    /// When the event happened, `H:MM` or `HH:MM`.
    pub entry_time: Option<String>,
    pub text: String,
    /// Recorded time to stamp the entry with.
    pub stamp: Option<NaiveTime>,
}

impl NewEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Replacement parts for an existing entry. The recorded time always stays.
#[derive(Debug, Clone, Default)]
pub struct EntryEdit {
    pub text: String,
    /// New key; `None` keeps the current one.
    pub key: Option<String>,
    /// New entry time; `None` keeps it, an empty string clears it.
    pub entry_time: Option<String>,
}

/// A habit and its value for the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStatus {
    pub key: String,
    pub kind: HabitKind,
    #[serde(serialize_with = "serialize_habit_value")]
    pub value: HabitValue,
}

/// Everything shown for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: DateKey,
    pub path: PathBuf,
    pub habits: Vec<HabitStatus>,
    pub events: Vec<EventRecord>,
}

/// Journal actions over a store.
#[derive(Debug)]
pub struct Journal<S> {
    store: S,
    settings: Settings,
}

impl<S: NoteStore + FrontmatterStore> Journal<S> {
    pub const fn new(store: S, settings: Settings) -> Self {
        Self { store, settings }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn note_path(&self, date: DateKey) -> PathBuf {
        self.store.resolve_note_path(date)
    }

    pub fn create_note(&mut self, date: DateKey) -> Result<PathBuf, VaultError> {
        self.store.create_note(date)
    }

    /// The day's habits and entries; `None` when the note does not exist.
    pub fn day(&self, date: DateKey) -> Result<Option<DayView>, VaultError> {
        let path = self.note_path(date);
        let Some(content) = self.store.read(&path)? else {
            return Ok(None);
        };
        let frontmatter = self.store.get_frontmatter(&path)?.unwrap_or_default();

        let habits = self
            .settings
            .habits
            .iter()
            .map(|habit| HabitStatus {
                key: habit.key.clone(),
                kind: habit.kind,
                value: HabitValue::from_frontmatter(habit.kind, frontmatter.get(&habit.key)),
            })
            .collect();

        Ok(Some(DayView {
            date,
            path,
            habits,
            events: document::list_events(&content),
        }))
    }

    /// Appends an entry and returns its line index.
    ///
    /// A `#tag` aliasing a log key overrides the requested key and is
    /// removed from the text.
    pub fn add_entry(&mut self, date: DateKey, entry: NewEntry) -> Result<usize, VaultError> {
        if entry.text.trim().is_empty() {
            return Err(VaultError::EmptyEntry);
        }
        let entry_time = entry.entry_time.as_deref().map(canonical_time).transpose()?;

        let routed = resolve_tag(&entry.text, &self.settings.log_keys);
        let key = routed
            .key
            .or(entry.key)
            .unwrap_or_else(|| self.settings.default_log_key().to_string());
        if routed.cleaned_text.trim().is_empty() {
            return Err(VaultError::EmptyEntry);
        }

        let path = self.note_path(date);
        let index = self
            .store
            .modify(&path, |content| {
                let updated = match entry.stamp {
                    Some(now) => document::append_entry_stamped(
                        content,
                        &key,
                        entry_time.as_deref(),
                        &routed.cleaned_text,
                        now,
                    ),
                    None => document::append_entry_unstamped(
                        content,
                        &key,
                        entry_time.as_deref(),
                        &routed.cleaned_text,
                    ),
                };
                Ok((updated, line_count(content)))
            })?
            .ok_or(VaultError::NoteNotFound { path })?;

        tracing::debug!(%date, key = %key, index, "added entry");
        Ok(index)
    }

    /// Rewrites the entry at `line_index`.
    pub fn edit_entry(
        &mut self,
        date: DateKey,
        line_index: usize,
        edit: EntryEdit,
    ) -> Result<Outcome, VaultError> {
        if edit.text.trim().is_empty() {
            return Err(VaultError::EmptyEntry);
        }
        let entry_time = match edit.entry_time.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(time) => Some(Some(canonical_time(time)?)),
        };

        self.modify_note(date, |content| {
            let Some(current) = event_at(content, line_index) else {
                return (content.to_string(), Outcome::Unchanged);
            };
            let key = edit.key.as_deref().unwrap_or(&current.key);
            let entry_time = entry_time.unwrap_or_else(|| current.entry_time.clone());
            let line = format_event_line(
                key,
                entry_time.as_deref(),
                &edit.text,
                current.recorded_time.as_deref(),
            );
            let updated = document::update_entry(content, line_index, &line);
            let outcome = if updated == content {
                Outcome::Unchanged
            } else {
                Outcome::Applied
            };
            (updated, outcome)
        })
    }

    /// Deletes the entry at `line_index`.
    pub fn remove_entry(&mut self, date: DateKey, line_index: usize) -> Result<Outcome, VaultError> {
        self.modify_note(date, |content| {
            if event_at(content, line_index).is_none() {
                return (content.to_string(), Outcome::Unchanged);
            }
            (document::remove_entry(content, line_index), Outcome::Applied)
        })
    }

    /// Moves the entry at `source` to the position of the entry at `dest`.
    pub fn move_entry(
        &mut self,
        date: DateKey,
        source: usize,
        dest: usize,
    ) -> Result<Outcome, VaultError> {
        self.modify_note(date, |content| {
            let updated = document::reorder_entries(content, source, dest);
            let outcome = if updated == content {
                Outcome::Unchanged
            } else {
                Outcome::Applied
            };
            (updated, outcome)
        })
    }

    /// Sets a habit from user input, coerced to the habit's kind.
    pub fn set_habit(&mut self, date: DateKey, key: &str, input: &str) -> Result<HabitValue, VaultError> {
        let habit = self
            .settings
            .habit(key)
            .ok_or_else(|| VaultError::UnknownHabit {
                key: key.to_string(),
            })?;
        let value = HabitValue::parse_input(habit.kind, input)?;
        let path = self.note_path(date);
        let json = value.to_json().unwrap_or(serde_json::Value::Null);
        self.store.set_frontmatter_field(&path, &habit.key, json)?;
        tracing::debug!(%date, habit = %habit.key, %value, "set habit");
        Ok(value)
    }

    fn modify_note<F>(&mut self, date: DateKey, edit: F) -> Result<Outcome, VaultError>
    where
        F: FnOnce(&str) -> (String, Outcome),
    {
        let path = self.note_path(date);
        let outcome = self
            .store
            .modify(&path, |content| Ok(edit(content)))?
            .ok_or(VaultError::NoteNotFound { path })?;
        if outcome == Outcome::Unchanged {
            tracing::debug!(%date, "note left unchanged");
        }
        Ok(outcome)
    }
}

fn event_at(content: &str, line_index: usize) -> Option<EventRecord> {
    content
        .split('\n')
        .nth(line_index)
        .and_then(|line| parse_event_line(line, line_index))
}

fn serialize_habit_value<S: Serializer>(value: &HabitValue, serializer: S) -> Result<S::Ok, S::Error> {
    value.to_json().serialize(serializer)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::MemoryVault;

    const NOTE: &str = "---\nСон: 7\n---\n# День\ndl:: 07:50 Проснулся (08:00)\nпрозаический абзац\nИдея:: Купить молоко (14:05)";

    fn date() -> DateKey {
        "2025-03-14".parse().unwrap()
    }

    fn journal() -> Journal<MemoryVault> {
        let mut store = MemoryVault::new();
        store.insert(date(), NOTE);
        Journal::new(store, Settings::default())
    }

    fn content(journal: &Journal<MemoryVault>) -> String {
        let path = journal.note_path(date());
        journal.store().get(&path).unwrap().to_string()
    }

    fn stamp() -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(9, 15, 0)
    }

    #[test]
    fn day_view_lists_habits_and_events() {
        let journal = journal();
        let view = journal.day(date()).unwrap().unwrap();
        assert_eq!(view.events.len(), 2);
        assert_eq!(view.events[0].line_index, 4);
        assert_eq!(view.habits[0].value, HabitValue::Number(7.0));
        assert_eq!(view.habits[1].value, HabitValue::Unset);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["date"], json!("2025-03-14"));
        assert_eq!(json["habits"][0], json!({"key": "Сон", "kind": "number", "value": 7}));
        assert_eq!(json["habits"][1]["value"], json!(null));
    }

    #[test]
    fn unreadable_frontmatter_leaves_habits_unset() {
        let mut store = MemoryVault::new();
        store.insert(date(), "---\n- не словарь\n---\ndl:: 07:50 Проснулся");
        let journal = Journal::new(store, Settings::default());

        let view = journal.day(date()).unwrap().unwrap();
        assert!(view.habits.iter().all(|habit| habit.value == HabitValue::Unset));
        assert_eq!(view.events.len(), 1);
        assert_eq!(view.events[0].text, "Проснулся");
    }

    #[test]
    fn missing_day_is_none() {
        let journal = journal();
        let other: DateKey = "2025-03-15".parse().unwrap();
        assert_eq!(journal.day(other).unwrap(), None);
    }

    #[test]
    fn add_uses_default_key_and_stamp() {
        let mut journal = journal();
        let index = journal
            .add_entry(
                date(),
                NewEntry {
                    entry_time: Some("9:05".to_string()),
                    stamp: stamp(),
                    ..NewEntry::new("Кофе")
                },
            )
            .unwrap();
        assert_eq!(index, 7);
        assert!(content(&journal).ends_with("\ndl:: 09:05 Кофе (09:15)"));
    }

    #[test]
    fn tag_overrides_requested_key() {
        let mut journal = journal();
        journal
            .add_entry(
                date(),
                NewEntry {
                    key: Some("dl".to_string()),
                    ..NewEntry::new("Позвонить маме #важно")
                },
            )
            .unwrap();
        assert!(content(&journal).ends_with("\nВажно:: Позвонить маме"));
    }

    #[test]
    fn unknown_tag_keeps_text_and_key() {
        let mut journal = journal();
        journal
            .add_entry(date(), NewEntry::new("Прогулка #парк"))
            .unwrap();
        assert!(content(&journal).ends_with("\ndl:: Прогулка #парк"));
    }

    #[test]
    fn blank_entries_are_rejected() {
        let mut journal = journal();
        for text in ["", "   ", "#идея"] {
            let err = journal.add_entry(date(), NewEntry::new(text)).unwrap_err();
            assert!(matches!(err, VaultError::EmptyEntry), "{text:?}");
        }
        assert_eq!(content(&journal), NOTE);
    }

    #[test]
    fn invalid_entry_time_is_rejected() {
        let mut journal = journal();
        let err = journal
            .add_entry(
                date(),
                NewEntry {
                    entry_time: Some("25:00".to_string()),
                    ..NewEntry::new("x")
                },
            )
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
    }

    #[test]
    fn add_to_missing_note_fails() {
        let mut journal = journal();
        let other: DateKey = "2025-03-15".parse().unwrap();
        let err = journal.add_entry(other, NewEntry::new("x")).unwrap_err();
        assert!(matches!(err, VaultError::NoteNotFound { .. }));
    }

    #[test]
    fn edit_keeps_recorded_time() {
        let mut journal = journal();
        let outcome = journal
            .edit_entry(
                date(),
                6,
                EntryEdit {
                    text: "Купить кефир".to_string(),
                    entry_time: Some("13:00".to_string()),
                    ..EntryEdit::default()
                },
            )
            .unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert!(content(&journal).ends_with("\nИдея:: 13:00 Купить кефир (14:05)"));
    }

    #[test]
    fn edit_can_change_key_and_clear_time() {
        let mut journal = journal();
        journal
            .edit_entry(
                date(),
                4,
                EntryEdit {
                    text: "Проснулся рано".to_string(),
                    key: Some("Важно::".to_string()),
                    entry_time: Some(String::new()),
                },
            )
            .unwrap();
        let lines: Vec<String> = content(&journal).split('\n').map(String::from).collect();
        assert_eq!(lines[4], "Важно:: Проснулся рано (08:00)");
    }

    #[test]
    fn stale_indices_are_unchanged() {
        let mut journal = journal();
        let edit = EntryEdit {
            text: "x".to_string(),
            ..EntryEdit::default()
        };
        assert_eq!(journal.edit_entry(date(), 5, edit.clone()).unwrap(), Outcome::Unchanged);
        assert_eq!(journal.edit_entry(date(), 99, edit).unwrap(), Outcome::Unchanged);
        assert_eq!(journal.remove_entry(date(), 3).unwrap(), Outcome::Unchanged);
        assert_eq!(journal.move_entry(date(), 4, 5).unwrap(), Outcome::Unchanged);
        assert_eq!(content(&journal), NOTE);
    }

    #[test]
    fn remove_and_move() {
        let mut journal = journal();
        assert_eq!(journal.move_entry(date(), 6, 4).unwrap(), Outcome::Applied);
        let view = journal.day(date()).unwrap().unwrap();
        assert_eq!(view.events[0].key, "Идея");

        assert_eq!(journal.remove_entry(date(), 4).unwrap(), Outcome::Applied);
        let view = journal.day(date()).unwrap().unwrap();
        assert_eq!(view.events.len(), 1);
        assert_eq!(view.events[0].text, "Проснулся");
        assert_eq!(view.events[0].line_index, 5);
    }

    #[test]
    fn set_habit_coerces_input() {
        let mut journal = journal();
        assert_eq!(
            journal.set_habit(date(), "Зарядка", "yes").unwrap(),
            HabitValue::Checked(true)
        );
        assert_eq!(
            journal.set_habit(date(), "Сон", "7.5").unwrap(),
            HabitValue::Number(7.5)
        );
        assert!(content(&journal).starts_with("---\nСон: 7.5\nЗарядка: true\n---\n# День\n"));

        assert!(matches!(
            journal.set_habit(date(), "Сон", "много"),
            Err(VaultError::Habit(_))
        ));
        assert!(matches!(
            journal.set_habit(date(), "Чтение", "1"),
            Err(VaultError::UnknownHabit { .. })
        ));
    }

    #[test]
    fn create_note_is_idempotent() {
        let mut journal = Journal::new(MemoryVault::new(), Settings::default());
        let path = journal.create_note(date()).unwrap();
        journal.add_entry(date(), NewEntry::new("x")).unwrap();
        assert_eq!(journal.create_note(date()).unwrap(), path);
        assert_eq!(content(&journal), "---\n---\n\ndl:: x");
    }
}
