//! YAML frontmatter helpers (pure functions over note text).
//!
//! Frontmatter is the block between a leading `---` line and the next `---`
//! line. The body after it is never re-rendered, so event lines keep their
//! exact bytes when a habit changes.

use std::path::Path;

use serde_json::Value;
use serde_yaml::Mapping;

use crate::{Frontmatter, VaultError};

/// Splits content into `(frontmatter yaml, body)`.
///
/// Without a complete fence the whole content is body.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, content)
}

/// Reconstructs content from a mapping and an untouched body.
pub fn render_with_frontmatter(mapping: &Mapping, body: &str) -> Result<String, VaultError> {
    let yaml = if mapping.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(mapping)?
    };
    let yaml = yaml.trim_end_matches('\n');
    if yaml.is_empty() {
        Ok(format!("---\n---\n{body}"))
    } else {
        Ok(format!("---\n{yaml}\n---\n{body}"))
    }
}

/// Parses the frontmatter fields of a note.
///
/// `Ok(None)` when there is no frontmatter block. An empty block is an
/// empty map.
pub fn read_fields(content: &str) -> Result<Option<Frontmatter>, VaultError> {
    let (Some(yaml), _) = split_frontmatter(content) else {
        return Ok(None);
    };
    let mapping = parse_mapping(yaml)?;
    mapping_to_fields(mapping).map(Some)
}

/// Like [`read_fields`], but unreadable frontmatter is logged and read as absent.
///
/// Every store reads frontmatter through this so a broken block never stops
/// a day from being shown.
pub fn read_fields_or_warn(path: &Path, content: &str) -> Option<Frontmatter> {
    match read_fields(content) {
        Ok(fields) => fields,
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "ignoring unreadable frontmatter");
            None
        }
    }
}

/// Returns the content with one frontmatter field set.
///
/// Other fields keep their values and order, and the body is kept byte for
/// byte. A note without frontmatter gains a block.
pub fn set_field(content: &str, key: &str, value: &Value) -> Result<String, VaultError> {
    let (yaml, body) = split_frontmatter(content);
    let mut mapping = match yaml {
        Some(yaml) => parse_mapping(yaml)?,
        None => Mapping::new(),
    };
    mapping.insert(
        serde_yaml::Value::String(key.to_string()),
        serde_yaml::to_value(value)?,
    );
    render_with_frontmatter(&mapping, body)
}

fn parse_mapping(yaml: &str) -> Result<Mapping, VaultError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        serde_yaml::Value::Null => Ok(Mapping::new()),
        _ => Err(VaultError::FrontmatterNotMapping),
    }
}

/// Non-string keys (`2025: x`) are rendered back to their YAML text.
fn mapping_to_fields(mapping: Mapping) -> Result<Frontmatter, VaultError> {
    let mut fields = Frontmatter::new();
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(key) => key,
            other => serde_yaml::to_string(&other)?.trim_end().to_string(),
        };
        fields.insert(key, serde_json::to_value(value)?);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn splits_frontmatter_and_body() {
        let (yaml, body) = split_frontmatter("---\nСон: 7\n---\n# Day\ndl:: x");
        assert_eq!(yaml, Some("Сон: 7\n"));
        assert_eq!(body, "# Day\ndl:: x");
    }

    #[test]
    fn unreadable_block_is_absent_when_lenient() {
        let path = Path::new("2025-03-14.md");
        assert!(read_fields("---\n- a\n---\n").is_err());
        assert_eq!(read_fields_or_warn(path, "---\n- a\n---\n"), None);
        assert_eq!(read_fields_or_warn(path, "---\nkey: [\n---\n"), None);
        assert_eq!(
            read_fields_or_warn(path, "---\nСон: 7\n---\n").unwrap()["Сон"],
            json!(7)
        );
    }

    #[test]
    fn empty_block_from_new_note() {
        let (yaml, body) = split_frontmatter("---\n---\n");
        assert_eq!(yaml, Some(""));
        assert_eq!(body, "");
        assert_eq!(read_fields("---\n---\n").unwrap(), Some(Frontmatter::new()));
    }

    #[test]
    fn unterminated_or_missing_block_is_body() {
        assert_eq!(split_frontmatter("# Title\n---\n"), (None, "# Title\n---\n"));
        assert_eq!(split_frontmatter("---\nkey: v\n"), (None, "---\nkey: v\n"));
        assert_eq!(read_fields("plain").unwrap(), None);
    }

    #[test]
    fn handles_crlf_fences() {
        let (yaml, body) = split_frontmatter("---\r\na: 1\r\n---\r\nbody");
        assert_eq!(yaml, Some("a: 1\r\n"));
        assert_eq!(body, "body");
    }

    #[test]
    fn reads_typed_fields_in_order() {
        let fields = read_fields("---\nСон: 7.5\nЗарядка: true\nmood: ok\n---\n")
            .unwrap()
            .unwrap();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Сон", "Зарядка", "mood"]);
        assert_eq!(fields["Сон"], json!(7.5));
        assert_eq!(fields["Зарядка"], json!(true));
        assert_eq!(fields["mood"], json!("ok"));
    }

    #[test]
    fn non_mapping_frontmatter_is_an_error() {
        assert!(matches!(
            read_fields("---\n- a\n- b\n---\n"),
            Err(VaultError::FrontmatterNotMapping)
        ));
        assert!(matches!(
            read_fields("---\nkey: [unclosed\n---\n"),
            Err(VaultError::Yaml(_))
        ));
    }

    #[test]
    fn set_field_keeps_other_fields_and_body() {
        let content = "---\nmood: ok\nСон: 7\n---\n# Day\ndl::   spaced   (10:00)\n";
        let updated = set_field(content, "Сон", &json!(8)).unwrap();
        assert_eq!(updated, "---\nmood: ok\nСон: 8\n---\n# Day\ndl::   spaced   (10:00)\n");
    }

    #[test]
    fn set_field_appends_new_keys() {
        let updated = set_field("---\n---\n", "Зарядка", &json!(true)).unwrap();
        assert_eq!(updated, "---\nЗарядка: true\n---\n");
    }

    #[test]
    fn set_field_adds_block_when_missing() {
        let updated = set_field("dl:: x\n", "Сон", &json!(7)).unwrap();
        assert_eq!(updated, "---\nСон: 7\n---\ndl:: x\n");
        assert_eq!(split_frontmatter(&updated).1, "dl:: x\n");
    }
}
