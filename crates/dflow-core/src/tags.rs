//! Tag routing: picking a log key from an inline `#tag`.
//!
//! Lets a user type `Сделал кофе #кофе` instead of choosing a category by
//! hand. Routing happens only when an entry is created; existing lines are
//! never re-routed.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::LogKeyConfig;

/// `#` followed by anything up to whitespace or the next `#`.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([^\s#]+)").unwrap());

static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Outcome of routing a piece of free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagResolution {
    /// Key the text routes to, or `None` to keep the caller's choice.
    pub key: Option<String>,
    /// Text to store. Only differs from the input when a key matched.
    pub cleaned_text: String,
}

/// Resolves the first `#tag` in `text` against the configured log keys.
///
/// The first key in configuration order with a matching alias wins. On a
/// match every standalone occurrence of that tag is removed from the text;
/// otherwise the text comes back untouched and the tag stays as markup.
pub fn resolve_tag(text: &str, log_keys: &[LogKeyConfig]) -> TagResolution {
    let unchanged = || TagResolution {
        key: None,
        cleaned_text: text.to_string(),
    };

    let Some(tag) = first_tag(text) else {
        return unchanged();
    };
    let Some(config) = log_keys.iter().find(|config| config.has_alias(tag)) else {
        tracing::trace!(tag, "tag does not route to any log key");
        return unchanged();
    };

    tracing::debug!(tag, key = %config.key, "routed entry by tag");
    TagResolution {
        key: Some(config.key.clone()),
        cleaned_text: strip_tag(text, tag),
    }
}

/// The first tag in the text, without `#` and without trailing punctuation.
pub fn first_tag(text: &str) -> Option<&str> {
    let caps = TAG_RE.captures(text)?;
    let tag = tag_name(caps.get(1)?.as_str());
    (!tag.is_empty()).then_some(tag)
}

fn tag_name(token: &str) -> &str {
    token.trim_end_matches(|c: char| c.is_ascii_punctuation())
}

/// Removes every `#tag` token that names exactly `tag`, keeping its trailing
/// punctuation. Longer tags sharing the prefix are left alone.
fn strip_tag(text: &str, tag: &str) -> String {
    let stripped = TAG_RE.replace_all(text, |caps: &Captures<'_>| {
        let token = &caps[1];
        let name = tag_name(token);
        if name == tag {
            token[name.len()..].to_string()
        } else {
            caps[0].to_string()
        }
    });
    WHITESPACE_RUN_RE
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}
