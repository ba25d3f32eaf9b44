use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dflow_core::DateKey;
use serde_json::Value;

use crate::frontmatter;
use crate::{Frontmatter, FrontmatterStore, NoteStore, VaultError};

/// In-memory store for tests.
///
/// Paths resolve the same way as on disk, under a virtual root.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    root: PathBuf,
    notes: HashMap<PathBuf, String>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::with_root("journal")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            notes: HashMap::new(),
        }
    }

    /// Seeds the note for `date`, returning its path.
    pub fn insert(&mut self, date: DateKey, content: impl Into<String>) -> PathBuf {
        let path = self.resolve_note_path(date);
        self.notes.insert(path.clone(), content.into());
        path
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.notes.get(path).map(String::as_str)
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

impl NoteStore for MemoryVault {
    fn resolve_note_path(&self, date: DateKey) -> PathBuf {
        self.root
            .join(date.year_dir())
            .join(date.month_dir())
            .join(format!("{date}.md"))
    }

    fn read(&self, path: &Path) -> Result<Option<String>, VaultError> {
        Ok(self.notes.get(path).cloned())
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<(), VaultError> {
        self.notes.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

impl FrontmatterStore for MemoryVault {
    fn get_frontmatter(&self, path: &Path) -> Result<Option<Frontmatter>, VaultError> {
        Ok(self
            .notes
            .get(path)
            .and_then(|content| frontmatter::read_fields_or_warn(path, content)))
    }

    fn set_frontmatter_field(
        &mut self,
        path: &Path,
        key: &str,
        value: Value,
    ) -> Result<(), VaultError> {
        let content = self
            .notes
            .get_mut(path)
            .ok_or_else(|| VaultError::NoteNotFound {
                path: path.to_path_buf(),
            })?;
        *content = frontmatter::set_field(content, key, &value)?;
        Ok(())
    }
}
