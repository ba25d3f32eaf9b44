//! Storage layer for daily flow.
//!
//! Notes are plain text files and the single source of truth. This crate
//! provides the collaborators the core needs to reach them:
//!
//! - [`NoteStore`]: resolve a date to a note path, read it, write it back
//! - [`FrontmatterStore`]: read the note's YAML frontmatter and set one field
//! - [`NoteWatcher`]: debounced change notification for a single note
//!
//! Two stores implement both traits: [`FileVault`] for the real journal
//! folder and [`MemoryVault`] for tests. [`Journal`] sits on top and runs
//! each user action as one read-modify-write.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! └── 2025/
//!     └── 03/
//!         ├── 2025-03-14.md
//!         └── .2025-03-14.md.lock   # advisory lock held during edits
//! ```
//!
//! # Concurrency
//!
//! A single active editor is assumed. Every mutation re-reads the note right
//! before computing the new content and writes it back before returning, so
//! edits issued one after another never interleave. [`FileVault`] also holds
//! an advisory lock across each read-modify-write.

use std::path::{Path, PathBuf};

use dflow_core::{DateKey, HabitError, ValidationError};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod frontmatter;
mod fs;
pub mod journal;
mod memory;
pub mod watch;

pub use fs::FileVault;
pub use journal::{DayView, EntryEdit, HabitStatus, Journal, NewEntry, Outcome};
pub use memory::MemoryVault;
pub use watch::{Debouncer, NoteWatcher};

/// Content of a freshly created daily note: an empty frontmatter block.
pub const NEW_NOTE_TEMPLATE: &str = "---\n---\n";

/// Frontmatter fields as JSON values, in document order.
pub type Frontmatter = Map<String, Value>;

/// Storage errors.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Reading or writing a file failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The note for the requested day does not exist.
    #[error("note not found: {}", path.display())]
    NoteNotFound { path: PathBuf },
    /// Frontmatter could not be parsed or rendered.
    #[error("invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Frontmatter parsed, but is not a key/value mapping.
    #[error("frontmatter is not a mapping")]
    FrontmatterNotMapping,
    /// A frontmatter value could not be converted.
    #[error("invalid frontmatter value: {0}")]
    Json(#[from] serde_json::Error),
    /// Entries need some text.
    #[error("entry text cannot be empty")]
    EmptyEntry,
    /// The habit is not configured.
    #[error("unknown habit: {key}")]
    UnknownHabit { key: String },
    /// A habit value did not fit the habit's type.
    #[error(transparent)]
    Habit(#[from] HabitError),
    /// A date or time failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The file watcher could not be set up.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl VaultError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Access to note text.
pub trait NoteStore {
    /// Deterministic path of the note for a day.
    fn resolve_note_path(&self, date: DateKey) -> PathBuf;

    /// Reads a note; `None` when it does not exist.
    fn read(&self, path: &Path) -> Result<Option<String>, VaultError>;

    /// Replaces a note's content, creating it (and its folders) if needed.
    fn write(&mut self, path: &Path, content: &str) -> Result<(), VaultError>;

    /// Creates the note for a day with an empty frontmatter block.
    ///
    /// An existing note is left alone. Returns the note path either way.
    fn create_note(&mut self, date: DateKey) -> Result<PathBuf, VaultError> {
        let path = self.resolve_note_path(date);
        if self.read(&path)?.is_some() {
            tracing::debug!(path = ?path, "note already exists");
            return Ok(path);
        }
        self.write(&path, NEW_NOTE_TEMPLATE)?;
        tracing::info!(path = ?path, "created daily note");
        Ok(path)
    }

    /// Reads, edits and writes a note as one step.
    ///
    /// `edit` returns the new content plus a value handed back to the
    /// caller. Nothing is written when the content is unchanged. Returns
    /// `None` when the note does not exist.
    fn modify<T, F>(&mut self, path: &Path, edit: F) -> Result<Option<T>, VaultError>
    where
        F: FnOnce(&str) -> Result<(String, T), VaultError>,
    {
        let Some(current) = self.read(path)? else {
            return Ok(None);
        };
        let (updated, value) = edit(&current)?;
        if updated != current {
            self.write(path, &updated)?;
        }
        Ok(Some(value))
    }
}

/// Access to a note's structured metadata.
pub trait FrontmatterStore {
    /// Frontmatter of a note; `None` when the note is missing or has none.
    fn get_frontmatter(&self, path: &Path) -> Result<Option<Frontmatter>, VaultError>;

    /// Sets one field, leaving every other field and the body as they were.
    fn set_frontmatter_field(
        &mut self,
        path: &Path,
        key: &str,
        value: Value,
    ) -> Result<(), VaultError>;
}
