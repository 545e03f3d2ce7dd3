use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::schema::FieldKind;

/// A value held by the draft. Absence is always an explicit empty value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(Option<f64>),
    List(Vec<String>),
    /// Only produced when reading a dotted group such as `pricing`.
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Time => FieldValue::Text(String::new()),
            FieldKind::Number => FieldValue::Number(None),
            FieldKind::List | FieldKind::ToggleList => FieldValue::List(Vec::new()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::List(_) => "list",
            FieldValue::Object(_) => "object",
        }
    }

    pub(crate) fn fits(&self, kind: FieldKind) -> bool {
        match self {
            FieldValue::Text(_) => matches!(kind, FieldKind::Text | FieldKind::Time),
            FieldValue::Number(_) => kind == FieldKind::Number,
            FieldValue::List(_) => kind.is_list(),
            FieldValue::Object(_) => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Number(number) => number.is_none(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Object(children) => children.values().all(FieldValue::is_empty),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(Some(value)) => f.write_str(&format_number(*value)),
            FieldValue::Number(None) => Ok(()),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
            FieldValue::Object(children) => {
                let parts: Vec<String> = children
                    .iter()
                    .map(|(key, value)| format!("{key}={value}"))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(Some(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(Some(f64::from(value)))
    }
}

impl From<Option<u32>> for FieldValue {
    fn from(value: Option<u32>) -> Self {
        FieldValue::Number(value.map(f64::from))
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Whole numbers print without decimals; fractional values keep two places.
pub fn format_number(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Converts a stored number into a non-negative whole count.
pub fn to_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_format_like_amounts() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(499.5), "499.50");
    }

    #[test]
    fn counts_clamp_negative_and_round() {
        assert_eq!(to_count(-3.0), 0);
        assert_eq!(to_count(2.6), 3);
        assert_eq!(to_count(f64::NAN), 0);
    }

    #[test]
    fn kinds_accept_matching_values() {
        assert!(FieldValue::from("x").fits(FieldKind::Time));
        assert!(FieldValue::from(vec!["a"]).fits(FieldKind::ToggleList));
        assert!(!FieldValue::from(3.0).fits(FieldKind::Text));
    }
}
