//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dflow_core::{HabitConfig, LogKeyConfig, Settings};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding the `YYYY/MM/YYYY-MM-DD.md` notes.
    pub journal_root: PathBuf,
    /// Note file extension.
    pub extension: String,
    /// Quiet period before `watch` reacts to a change.
    pub debounce_ms: u64,
    pub habits: Vec<HabitConfig>,
    pub log_keys: Vec<LogKeyConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let settings = Settings::default();
        Self {
            journal_root: data_dir.join("journal"),
            extension: "md".to_string(),
            debounce_ms: 75,
            habits: settings.habits,
            log_keys: settings.log_keys,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // DFLOW_JOURNAL_ROOT, DFLOW_DEBOUNCE_MS, ...
        figment = figment.merge(Env::prefixed("DFLOW_"));

        figment.extract()
    }

    pub fn settings(&self) -> Settings {
        Settings {
            habits: self.habits.clone(),
            log_keys: self.log_keys.clone(),
        }
    }

    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Returns the platform-specific config directory for dflow.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dflow"))
}

/// Returns the platform-specific data directory for dflow.
///
/// On Linux: `~/.local/share/dflow`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("dflow"))
}
