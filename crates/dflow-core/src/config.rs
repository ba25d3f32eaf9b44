//! Habit and log-key definitions.
//!
//! These are plain data handed in by whatever loads configuration. Loosely
//! shaped input (a `tags` field that is a string, a list, or garbage) is
//! coerced once at deserialization so matching code only ever sees a list of
//! normalized aliases.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::line_format::normalize_key;

/// Key used when no log keys are configured at all.
pub const FALLBACK_LOG_KEY: &str = "dl";

const SLEEP_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M12 3a6 6 0 0 0 9 9 9 9 0 1 1-9-9"/><path d="M20 3v4"/><path d="M22 5h-4"/></svg>"#;
const EXERCISE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="m18 15-6-6-6 6"/></svg>"#;

/// How a habit's value is stored in frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    Checkbox,
    Number,
    Text,
}

/// A tracked habit. `key` doubles as the frontmatter property name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitConfig {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: HabitKind,
    #[serde(default, alias = "iconSvg")]
    pub icon_svg: String,
}

impl HabitConfig {
    pub fn new(key: impl Into<String>, kind: HabitKind, icon_svg: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            icon_svg: icon_svg.into(),
        }
    }
}

/// A log category and the tag aliases that route to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogKeyConfig {
    #[serde(deserialize_with = "deserialize_key")]
    pub key: String,
    #[serde(default, alias = "iconSvg")]
    pub icon_svg: String,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
}

impl LogKeyConfig {
    /// Builds a log key from its textual form; `tags` is split on `,` and `;`.
    pub fn new(key: &str, icon_svg: impl Into<String>, tags: &str) -> Self {
        Self {
            key: normalize_key(key).to_string(),
            icon_svg: icon_svg.into(),
            tags: split_aliases(tags),
        }
    }

    /// Case-insensitive alias lookup. The tag may carry its leading `#`.
    pub fn has_alias(&self, tag: &str) -> bool {
        let wanted = normalize_alias(tag).to_lowercase();
        !wanted.is_empty() && self.tags.iter().any(|alias| alias.to_lowercase() == wanted)
    }
}

/// The full set of habit and log-key definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub habits: Vec<HabitConfig>,
    #[serde(default)]
    pub log_keys: Vec<LogKeyConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            habits: vec![
                HabitConfig::new("Сон", HabitKind::Number, SLEEP_ICON),
                HabitConfig::new("Зарядка", HabitKind::Checkbox, EXERCISE_ICON),
            ],
            log_keys: vec![
                LogKeyConfig::new("dl::", "📄", ""),
                LogKeyConfig::new("Важно::", "🔥", "важно"),
                LogKeyConfig::new("Идея::", "💡", "идея"),
            ],
        }
    }
}

impl Settings {
    pub fn habit(&self, key: &str) -> Option<&HabitConfig> {
        self.habits.iter().find(|habit| habit.key == key)
    }

    pub fn log_key(&self, key: &str) -> Option<&LogKeyConfig> {
        let key = normalize_key(key);
        self.log_keys.iter().find(|config| config.key == key)
    }

    /// Icon for a parsed event key, if one is configured and non-empty.
    pub fn icon_for(&self, key: &str) -> Option<&str> {
        self.log_key(key)
            .map(|config| config.icon_svg.as_str())
            .filter(|icon| !icon.is_empty())
    }

    /// The key new entries get when neither the user nor a tag picks one.
    pub fn default_log_key(&self) -> &str {
        self.log_keys
            .first()
            .map_or(FALLBACK_LOG_KEY, |config| config.key.as_str())
    }
}

fn normalize_alias(alias: &str) -> &str {
    alias.trim().trim_start_matches('#').trim()
}

fn split_aliases(joined: &str) -> Vec<String> {
    joined
        .split([',', ';'])
        .map(normalize_alias)
        .filter(|alias| !alias.is_empty())
        .map(String::from)
        .collect()
}

fn deserialize_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let key = String::deserialize(deserializer)?;
    Ok(normalize_key(&key).to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Joined(String),
    List(Vec<RawTag>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTag {
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match RawTags::deserialize(deserializer)? {
        RawTags::Joined(joined) => split_aliases(&joined),
        RawTags::List(items) => items
            .iter()
            .filter_map(|item| match item {
                RawTag::Text(text) => Some(normalize_alias(text)),
                RawTag::Other(_) => None,
            })
            .filter(|alias| !alias.is_empty())
            .map(String::from)
            .collect(),
        RawTags::Other(_) => Vec::new(),
    };
    Ok(tags)
}
