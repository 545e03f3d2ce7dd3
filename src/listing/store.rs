use std::collections::BTreeMap;

use chrono::NaiveTime;
use tracing::debug;

use crate::errors::{ListingError, Result};

use super::derive::DerivationEngine;
use super::schema::{self, fields, FieldKind, FieldSpec, SCHEMA};
use super::value::{format_number, FieldValue};

/// List fields written comma-separated into the stored description.
const COMMA_SEPARATED: &[&str] = &[fields::MEAL_PLANS, fields::PAYMENT_METHODS];

/// Snapshot of every field, keyed by path.
pub type FieldSnapshot = BTreeMap<String, FieldValue>;

/// Starting values for a fresh draft.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftDefaults {
    pub country: String,
    pub currency: String,
    pub check_in: String,
    pub check_out: String,
    pub minimum_stay: u32,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            country: "India".into(),
            currency: "INR".into(),
            check_in: "14:00".into(),
            check_out: "11:00".into(),
            minimum_stay: 1,
        }
    }
}

/// Raw path → value table. Every schema path is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues {
    entries: BTreeMap<&'static str, FieldValue>,
}

impl FieldValues {
    fn empty() -> Self {
        let entries = SCHEMA
            .iter()
            .map(|spec| (spec.path, FieldValue::empty(spec.kind)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, path: &str) -> Option<&FieldValue> {
        self.entries.get(path)
    }

    pub fn text(&self, path: &str) -> &str {
        match self.entries.get(path) {
            Some(FieldValue::Text(text)) => text,
            _ => "",
        }
    }

    pub fn number(&self, path: &str) -> Option<f64> {
        match self.entries.get(path) {
            Some(FieldValue::Number(number)) => *number,
            _ => None,
        }
    }

    pub fn list(&self, path: &str) -> &[String] {
        match self.entries.get(path) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Writes a value that the caller has already checked against the schema.
    /// Returns whether the stored value changed.
    pub(crate) fn put(&mut self, path: &'static str, value: FieldValue) -> bool {
        match self.entries.get_mut(path) {
            Some(current) if *current == value => false,
            Some(current) => {
                *current = value;
                true
            }
            None => false,
        }
    }

    fn list_mut(&mut self, path: &str) -> Option<&mut Vec<String>> {
        match self.entries.get_mut(path) {
            Some(FieldValue::List(items)) => Some(items),
            _ => None,
        }
    }
}

/// The wizard's working draft.
///
/// All writes go through the typed setters below, which check the path and
/// value kind against the schema and then run any derivation rule the path
/// triggers.
#[derive(Debug, Clone)]
pub struct FieldStore {
    values: FieldValues,
    derivations: DerivationEngine,
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldStore {
    pub fn new() -> Self {
        Self::with_defaults(&DraftDefaults::default())
    }

    pub fn with_defaults(defaults: &DraftDefaults) -> Self {
        let mut values = FieldValues::empty();
        values.put(fields::COUNTRY, defaults.country.clone().into());
        values.put(fields::CURRENCY, defaults.currency.clone().into());
        values.put(fields::CHECK_IN_TIME, defaults.check_in.clone().into());
        values.put(fields::CHECK_OUT_TIME, defaults.check_out.clone().into());
        values.put(fields::MINIMUM_STAY, defaults.minimum_stay.into());
        Self {
            values,
            derivations: DerivationEngine::standard(),
        }
    }

    /// Replaces the derivation rules. Existing values are left as they are.
    pub fn with_derivations(mut self, derivations: DerivationEngine) -> Self {
        self.derivations = derivations;
        self
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn text(&self, path: &str) -> &str {
        self.values.text(path)
    }

    pub fn number(&self, path: &str) -> Option<f64> {
        self.values.number(path)
    }

    pub fn list(&self, path: &str) -> &[String] {
        self.values.list(path)
    }

    /// Reads a field, or a nested object when `path` names a dotted group.
    pub fn get(&self, path: &str) -> Result<FieldValue> {
        if let Some(value) = self.values.get(path) {
            return Ok(value.clone());
        }
        if schema::is_group(path) {
            let prefix = format!("{path}.");
            let children = SCHEMA
                .iter()
                .filter_map(|spec| {
                    let key = spec.path.strip_prefix(&prefix)?;
                    let value = self.values.get(spec.path)?;
                    Some((key.to_string(), value.clone()))
                })
                .collect();
            return Ok(FieldValue::Object(children));
        }
        Err(unknown(path))
    }

    pub fn get_all(&self) -> FieldSnapshot {
        self.values
            .entries
            .iter()
            .map(|(path, value)| (path.to_string(), value.clone()))
            .collect()
    }

    /// Sets a field to a typed value. List values are deduplicated in order.
    pub fn set(&mut self, path: &str, value: impl Into<FieldValue>) -> Result<()> {
        let spec = resolve(path)?;
        let value = value.into();
        if !value.fits(spec.kind) {
            return Err(ListingError::TypeMismatch {
                path: path.to_string(),
                expected: spec.kind,
                found: value.kind_name(),
            });
        }
        let value = match (spec.kind, value) {
            (FieldKind::Time, FieldValue::Text(text)) => FieldValue::Text(parse_time(path, &text)?),
            (_, FieldValue::List(items)) => {
                let items = normalize_items(items);
                check_separator(spec, &items)?;
                FieldValue::List(items)
            }
            (_, other) => other,
        };
        self.write(spec, value);
        Ok(())
    }

    /// Sets a field from raw host input, coercing it to the field's kind.
    ///
    /// Empty input clears the field. Lists accept comma-separated items.
    pub fn set_input(&mut self, path: &str, raw: &str) -> Result<()> {
        let spec = resolve(path)?;
        let trimmed = raw.trim();
        let value = match spec.kind {
            FieldKind::Text => FieldValue::Text(trimmed.to_string()),
            FieldKind::Time => FieldValue::Text(parse_time(path, trimmed)?),
            FieldKind::Number if trimmed.is_empty() => FieldValue::Number(None),
            FieldKind::Number => {
                let number = trimmed.parse::<f64>().map_err(|_| ListingError::InvalidValue {
                    path: path.to_string(),
                    reason: format!("`{trimmed}` is not a number"),
                })?;
                if !number.is_finite() || number < 0.0 {
                    return Err(ListingError::InvalidValue {
                        path: path.to_string(),
                        reason: "value must be zero or positive".into(),
                    });
                }
                FieldValue::Number(Some(number))
            }
            FieldKind::List | FieldKind::ToggleList => FieldValue::List(normalize_items(
                trimmed.split(',').map(str::to_string).collect(),
            )),
        };
        self.write(spec, value);
        Ok(())
    }

    /// Flips membership of `item` in a multi-select field.
    /// Returns true when the item is selected afterwards.
    pub fn toggle(&mut self, path: &str, item: &str) -> Result<bool> {
        let spec = resolve(path)?;
        if spec.kind != FieldKind::ToggleList {
            return Err(ListingError::TypeMismatch {
                path: path.to_string(),
                expected: spec.kind,
                found: "toggle",
            });
        }
        let item = require_item(path, item)?;
        check_separator(spec, std::slice::from_ref(&item))?;
        let mut items = self.values.list(spec.path).to_vec();
        let selected = match items.iter().position(|existing| *existing == item) {
            Some(index) => {
                items.remove(index);
                false
            }
            None => {
                items.push(item);
                true
            }
        };
        self.write(spec, FieldValue::List(items));
        Ok(selected)
    }

    /// Appends `item` to a list field unless it is already present.
    pub fn push(&mut self, path: &str, item: &str) -> Result<bool> {
        let spec = resolve_list(path)?;
        let item = require_item(path, item)?;
        check_separator(spec, std::slice::from_ref(&item))?;
        if self.values.list(spec.path).contains(&item) {
            return Ok(false);
        }
        let mut items = self.values.list(spec.path).to_vec();
        items.push(item);
        self.write(spec, FieldValue::List(items));
        Ok(true)
    }

    /// Removes `item` from a list field. Returns false when it was absent.
    pub fn remove(&mut self, path: &str, item: &str) -> Result<bool> {
        let spec = resolve_list(path)?;
        let item = item.trim();
        let removed = match self.values.list_mut(spec.path) {
            Some(items) => {
                let before = items.len();
                items.retain(|existing| existing != item);
                items.len() != before
            }
            None => false,
        };
        if removed {
            debug!(field = spec.path, item, "list item removed");
            self.derivations.apply(spec.path, &mut self.values);
        }
        Ok(removed)
    }

    /// Writes a persisted value verbatim, skipping derivations.
    pub(crate) fn load(&mut self, path: &'static str, value: FieldValue) {
        debug_assert!(
            schema::lookup(path).is_some_and(|spec| value.fits(spec.kind)),
            "load of `{path}` does not match the schema"
        );
        self.values.put(path, value);
    }

    fn write(&mut self, spec: &'static FieldSpec, value: FieldValue) {
        if self.values.put(spec.path, value) {
            debug!(field = spec.path, "field updated");
        }
        let derived = self.derivations.apply(spec.path, &mut self.values);
        if !derived.is_empty() {
            debug!(field = spec.path, ?derived, "derived fields recomputed");
        }
    }
}

fn unknown(path: &str) -> ListingError {
    ListingError::UnknownField {
        path: path.to_string(),
        suggestion: schema::suggest(path),
    }
}

fn resolve(path: &str) -> Result<&'static FieldSpec> {
    schema::lookup(path).ok_or_else(|| unknown(path))
}

fn resolve_list(path: &str) -> Result<&'static FieldSpec> {
    let spec = resolve(path)?;
    if spec.kind.is_list() {
        Ok(spec)
    } else {
        Err(ListingError::TypeMismatch {
            path: path.to_string(),
            expected: spec.kind,
            found: "list item",
        })
    }
}

fn require_item(path: &str, item: &str) -> Result<String> {
    let trimmed = item.trim();
    if trimmed.is_empty() {
        Err(ListingError::InvalidValue {
            path: path.to_string(),
            reason: "item cannot be empty".into(),
        })
    } else {
        Ok(trimmed.to_string())
    }
}

fn check_separator(spec: &FieldSpec, items: &[String]) -> Result<()> {
    if !COMMA_SEPARATED.contains(&spec.path) {
        return Ok(());
    }
    match items.iter().find(|item| item.contains(',')) {
        Some(item) => Err(ListingError::InvalidValue {
            path: spec.path.to_string(),
            reason: format!("`{item}` cannot contain a comma"),
        }),
        None => Ok(()),
    }
}

fn parse_time(path: &str, input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| ListingError::InvalidValue {
            path: path.to_string(),
            reason: "use 24-hour HH:MM format".into(),
        })
}

fn normalize_items(items: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if !trimmed.is_empty() && !normalized.iter().any(|existing| existing == trimmed) {
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

/// Human-readable rendering of a stored value, used by host summaries.
pub fn describe(value: &FieldValue) -> String {
    match value {
        FieldValue::Number(Some(number)) => format_number(*number),
        FieldValue::Number(None) => "[unfilled]".into(),
        other if other.is_empty() => "[unfilled]".into(),
        other => other.to_string(),
    }
}
