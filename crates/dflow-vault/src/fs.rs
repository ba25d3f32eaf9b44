use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dflow_core::DateKey;
use fs2::FileExt;
use serde_json::Value;

use crate::frontmatter;
use crate::{Frontmatter, FrontmatterStore, NoteStore, VaultError};

/// Journal folder on disk, laid out as `<root>/<YYYY>/<MM>/<YYYY-MM-DD>.<ext>`.
#[derive(Debug, Clone)]
pub struct FileVault {
    root: PathBuf,
    extension: String,
}

impl FileVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "md".to_string(),
        }
    }

    /// Uses a different note extension; a leading `.` is optional.
    #[must_use]
    pub fn with_extension(mut self, ext: &str) -> Self {
        self.extension = ext.trim_start_matches('.').to_string();
        self
    }

    /// Hidden lock file next to the note.
    fn lock_path(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        path.with_file_name(format!(".{name}.lock"))
    }
}

impl NoteStore for FileVault {
    fn resolve_note_path(&self, date: DateKey) -> PathBuf {
        self.root
            .join(date.year_dir())
            .join(date.month_dir())
            .join(format!("{date}.{}", self.extension))
    }

    fn read(&self, path: &Path) -> Result<Option<String>, VaultError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::io(path, e)),
        }
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<(), VaultError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| VaultError::io(parent, e))?;
        }
        fs::write(path, content).map_err(|e| VaultError::io(path, e))?;
        tracing::debug!(path = ?path, bytes = content.len(), "wrote note");
        Ok(())
    }

    fn modify<T, F>(&mut self, path: &Path, edit: F) -> Result<Option<T>, VaultError>
    where
        F: FnOnce(&str) -> Result<(String, T), VaultError>,
    {
        if !path.exists() {
            return Ok(None);
        }

        // Held until dropped at the end of this call.
        let lock_path = Self::lock_path(path);
        let lock = File::create(&lock_path).map_err(|e| VaultError::io(&lock_path, e))?;
        lock.lock_exclusive()
            .map_err(|e| VaultError::io(&lock_path, e))?;

        let Some(current) = self.read(path)? else {
            return Ok(None);
        };
        let (updated, value) = edit(&current)?;
        if updated == current {
            tracing::debug!(path = ?path, "note unchanged");
        } else {
            self.write(path, &updated)?;
        }
        Ok(Some(value))
    }
}

impl FrontmatterStore for FileVault {
    fn get_frontmatter(&self, path: &Path) -> Result<Option<Frontmatter>, VaultError> {
        Ok(self
            .read(path)?
            .and_then(|content| frontmatter::read_fields_or_warn(path, &content)))
    }

    fn set_frontmatter_field(
        &mut self,
        path: &Path,
        key: &str,
        value: Value,
    ) -> Result<(), VaultError> {
        self.modify(path, |content| {
            Ok((frontmatter::set_field(content, key, &value)?, ()))
        })?
        .ok_or_else(|| VaultError::NoteNotFound {
            path: path.to_path_buf(),
        })
    }
}
