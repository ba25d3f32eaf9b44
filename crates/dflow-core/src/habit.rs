//! Typed habit values on top of loosely typed frontmatter.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::config::HabitKind;

/// Errors coercing user input into a habit value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HabitError {
    #[error("expected yes/no for a checkbox habit, got {value:?}")]
    InvalidCheckbox { value: String },

    #[error("expected a number, got {value:?}")]
    InvalidNumber { value: String },
}

/// A habit's value for one day.
#[derive(Debug, Clone, PartialEq)]
pub enum HabitValue {
    /// No value in frontmatter.
    Unset,
    Checked(bool),
    Number(f64),
    Text(String),
}

impl HabitValue {
    /// Reads a frontmatter value as the given kind of habit.
    ///
    /// A checkbox is checked only by a literal `true`. Values that do not fit
    /// a number habit are surfaced as text rather than dropped.
    pub fn from_frontmatter(kind: HabitKind, value: Option<&Value>) -> Self {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Self::Unset;
        };

        match kind {
            HabitKind::Checkbox => Self::Checked(value.as_bool() == Some(true)),
            HabitKind::Number => match value {
                Value::Number(n) => n.as_f64().map_or_else(|| Self::Text(n.to_string()), Self::Number),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map_or_else(|| Self::Text(s.clone()), Self::Number),
                other => Self::Text(other.to_string()),
            },
            HabitKind::Text => match value {
                Value::String(s) => Self::Text(s.clone()),
                other => Self::Text(other.to_string()),
            },
        }
    }

    /// Coerces what a user typed into a value of the given kind.
    pub fn parse_input(kind: HabitKind, input: &str) -> Result<Self, HabitError> {
        match kind {
            HabitKind::Checkbox => match input.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" | "x" | "✓" => Ok(Self::Checked(true)),
                "false" | "no" | "off" | "0" | "" => Ok(Self::Checked(false)),
                _ => Err(HabitError::InvalidCheckbox {
                    value: input.to_string(),
                }),
            },
            HabitKind::Number => input
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .ok_or_else(|| HabitError::InvalidNumber {
                    value: input.to_string(),
                }),
            HabitKind::Text => Ok(Self::Text(input.to_string())),
        }
    }

    /// The frontmatter representation, or `None` when unset.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Unset => None,
            Self::Checked(checked) => Some(Value::Bool(*checked)),
            Self::Number(n) => Some(number_to_json(*n)),
            Self::Text(text) => Some(Value::String(text.clone())),
        }
    }
}

impl fmt::Display for HabitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "—"),
            Self::Checked(true) => write!(f, "✓"),
            Self::Checked(false) => write!(f, "✗"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Whole numbers are written as integers so `8` does not become `8.0`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "only whole values well inside the i64 range are converted"
)]
fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn checkbox_only_checked_by_literal_true() {
        let read = |v: Value| HabitValue::from_frontmatter(HabitKind::Checkbox, Some(&v));
        assert_eq!(read(json!(true)), HabitValue::Checked(true));
        assert_eq!(read(json!(false)), HabitValue::Checked(false));
        assert_eq!(read(json!("true")), HabitValue::Checked(false));
        assert_eq!(read(json!(1)), HabitValue::Checked(false));
    }

    #[test]
    fn missing_and_null_are_unset() {
        assert_eq!(HabitValue::from_frontmatter(HabitKind::Number, None), HabitValue::Unset);
        assert_eq!(
            HabitValue::from_frontmatter(HabitKind::Text, Some(&Value::Null)),
            HabitValue::Unset
        );
    }

    #[test]
    fn number_reads_numbers_and_numeric_strings() {
        let read = |v: Value| HabitValue::from_frontmatter(HabitKind::Number, Some(&v));
        assert_eq!(read(json!(7.5)), HabitValue::Number(7.5));
        assert_eq!(read(json!(8)), HabitValue::Number(8.0));
        assert_eq!(read(json!(" 6 ")), HabitValue::Number(6.0));
        assert_eq!(read(json!("a lot")), HabitValue::Text("a lot".into()));
    }

    #[test]
    fn text_renders_any_scalar() {
        let read = |v: Value| HabitValue::from_frontmatter(HabitKind::Text, Some(&v));
        assert_eq!(read(json!("fine")), HabitValue::Text("fine".into()));
        assert_eq!(read(json!(3)), HabitValue::Text("3".into()));
        assert_eq!(read(json!(true)), HabitValue::Text("true".into()));
    }

    #[test]
    fn parses_checkbox_input() {
        for yes in ["yes", "TRUE", " x ", "1", "on"] {
            assert_eq!(
                HabitValue::parse_input(HabitKind::Checkbox, yes),
                Ok(HabitValue::Checked(true))
            );
        }
        for no in ["no", "false", "0", ""] {
            assert_eq!(
                HabitValue::parse_input(HabitKind::Checkbox, no),
                Ok(HabitValue::Checked(false))
            );
        }
        assert!(HabitValue::parse_input(HabitKind::Checkbox, "maybe").is_err());
    }

    #[test]
    fn parses_number_input() {
        assert_eq!(
            HabitValue::parse_input(HabitKind::Number, " 7.5 "),
            Ok(HabitValue::Number(7.5))
        );
        assert_eq!(
            HabitValue::parse_input(HabitKind::Number, ""),
            Err(HabitError::InvalidNumber { value: String::new() })
        );
        assert!(HabitValue::parse_input(HabitKind::Number, "NaN").is_err());
        assert!(HabitValue::parse_input(HabitKind::Number, "inf").is_err());
    }

    #[test]
    fn json_form_keeps_whole_numbers_integral() {
        assert_eq!(HabitValue::Number(8.0).to_json(), Some(json!(8)));
        assert_eq!(HabitValue::Number(7.5).to_json(), Some(json!(7.5)));
        assert_eq!(HabitValue::Checked(true).to_json(), Some(json!(true)));
        assert_eq!(HabitValue::Text("ok".into()).to_json(), Some(json!("ok")));
        assert_eq!(HabitValue::Unset.to_json(), None);
    }

    #[test]
    fn display_forms() {
        assert_eq!(HabitValue::Unset.to_string(), "—");
        assert_eq!(HabitValue::Checked(true).to_string(), "✓");
        assert_eq!(HabitValue::Number(8.0).to_string(), "8");
        assert_eq!(HabitValue::Number(7.5).to_string(), "7.5");
    }
}
