//! One-directional recompute rules for derived draft fields.

use std::fmt;

use crate::errors::{ListingError, Result};

use super::schema::{fields, DAY_PICNIC};
use super::store::FieldValues;
use super::value::FieldValue;

type ComputeFn = fn(&FieldValues) -> Option<FieldValue>;

/// `triggers -> target` recompute rule. `compute` returning `None` leaves the
/// target untouched.
#[derive(Clone, Copy)]
pub struct DerivationRule {
    pub name: &'static str,
    pub triggers: &'static [&'static str],
    pub target: &'static str,
    pub compute: ComputeFn,
}

impl fmt::Debug for DerivationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationRule")
            .field("name", &self.name)
            .field("triggers", &self.triggers)
            .field("target", &self.target)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct DerivationEngine {
    rules: Vec<DerivationRule>,
}

impl DerivationEngine {
    /// Builds an engine, rejecting rule sets where a derived field also
    /// triggers a rule.
    pub fn new(rules: Vec<DerivationRule>) -> Result<Self> {
        for rule in &rules {
            if rules.iter().any(|other| other.triggers.contains(&rule.target)) {
                return Err(ListingError::DerivationCycle { field: rule.target });
            }
        }
        Ok(Self { rules })
    }

    pub fn standard() -> Self {
        Self {
            rules: standard_rules(),
        }
    }

    pub fn rules(&self) -> &[DerivationRule] {
        &self.rules
    }

    /// Runs every rule triggered by `changed`. Returns the targets that changed.
    pub(crate) fn apply(&self, changed: &str, values: &mut FieldValues) -> Vec<&'static str> {
        let mut updated = Vec::new();
        for rule in self.rules.iter().filter(|rule| rule.triggers.contains(&changed)) {
            if let Some(value) = (rule.compute)(values) {
                if values.put(rule.target, value) {
                    updated.push(rule.target);
                }
            }
        }
        updated
    }
}

pub fn standard_rules() -> Vec<DerivationRule> {
    vec![
        DerivationRule {
            name: "capacity",
            triggers: &[
                fields::ROOMS_COUNT,
                fields::CAPACITY_PER_ROOM,
                fields::DAY_PICNIC_CAPACITY,
                fields::PROPERTY_TYPE,
            ],
            target: fields::MAX_GUESTS,
            compute: max_guests,
        },
        DerivationRule {
            name: "address",
            triggers: &[fields::AREA, fields::CITY, fields::STATE, fields::COUNTRY],
            target: fields::ADDRESS,
            compute: address,
        },
    ]
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Day picnic listings count heads directly; everything else is rooms × per-room capacity.
fn max_guests(values: &FieldValues) -> Option<FieldValue> {
    if values.text(fields::PROPERTY_TYPE) == DAY_PICNIC {
        let capacity = present(values.number(fields::DAY_PICNIC_CAPACITY))?;
        return Some(FieldValue::Number(Some(capacity)));
    }
    let rooms = present(values.number(fields::ROOMS_COUNT))?;
    let per_room = present(values.number(fields::CAPACITY_PER_ROOM))?;
    Some(FieldValue::Number(Some(rooms * per_room)))
}

fn address(values: &FieldValues) -> Option<FieldValue> {
    let parts: Vec<&str> = [fields::AREA, fields::CITY, fields::STATE, fields::COUNTRY]
        .iter()
        .map(|path| values.text(path).trim())
        .filter(|part| !part.is_empty())
        .collect();
    Some(FieldValue::Text(parts.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::FieldStore;

    #[test]
    fn standard_rules_have_no_chains() {
        assert!(DerivationEngine::new(standard_rules()).is_ok());
    }

    #[test]
    fn derived_field_cannot_be_a_trigger() {
        let mut rules = standard_rules();
        rules.push(DerivationRule {
            name: "echo",
            triggers: &[fields::MAX_GUESTS],
            target: fields::BEDROOMS,
            compute: |_| None,
        });
        let err = DerivationEngine::new(rules).unwrap_err();
        assert!(matches!(
            err,
            ListingError::DerivationCycle { field } if field == fields::MAX_GUESTS
        ));
    }

    #[test]
    fn rooms_times_capacity() {
        let mut store = FieldStore::new();
        store.set(fields::PROPERTY_TYPE, "villa").unwrap();
        store.set(fields::ROOMS_COUNT, 3u32).unwrap();
        assert_eq!(store.number(fields::MAX_GUESTS), None);
        store.set(fields::CAPACITY_PER_ROOM, 4u32).unwrap();
        assert_eq!(store.number(fields::MAX_GUESTS), Some(12.0));
        store.set(fields::ROOMS_COUNT, 5u32).unwrap();
        assert_eq!(store.number(fields::MAX_GUESTS), Some(20.0));
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut store = FieldStore::new();
        store.set(fields::ROOMS_COUNT, 3u32).unwrap();
        store.set(fields::CAPACITY_PER_ROOM, 4u32).unwrap();
        let first = store.number(fields::MAX_GUESTS);
        store.set(fields::CAPACITY_PER_ROOM, 4u32).unwrap();
        store.set(fields::ROOMS_COUNT, 3u32).unwrap();
        assert_eq!(store.number(fields::MAX_GUESTS), first);
        assert_eq!(first, Some(12.0));
    }

    #[test]
    fn day_picnic_uses_head_count_only() {
        let mut store = FieldStore::new();
        store.set(fields::ROOMS_COUNT, 3u32).unwrap();
        store.set(fields::CAPACITY_PER_ROOM, 4u32).unwrap();
        store.set(fields::DAY_PICNIC_CAPACITY, 60u32).unwrap();
        assert_eq!(store.number(fields::MAX_GUESTS), Some(12.0));

        store.set(fields::PROPERTY_TYPE, DAY_PICNIC).unwrap();
        assert_eq!(store.number(fields::MAX_GUESTS), Some(60.0));

        store.set(fields::ROOMS_COUNT, 10u32).unwrap();
        assert_eq!(store.number(fields::MAX_GUESTS), Some(60.0));
    }

    #[test]
    fn address_joins_non_empty_parts() {
        let mut store = FieldStore::new();
        store.set(fields::STATE, "Goa").unwrap();
        assert_eq!(store.text(fields::ADDRESS), "Goa, India");
        store.set(fields::CITY, "Panaji").unwrap();
        store.set(fields::AREA, "Altinho").unwrap();
        assert_eq!(store.text(fields::ADDRESS), "Altinho, Panaji, Goa, India");
        store.set(fields::CITY, "").unwrap();
        assert_eq!(store.text(fields::ADDRESS), "Altinho, Goa, India");
    }

    #[test]
    fn setting_a_derived_field_directly_runs_nothing() {
        let mut store = FieldStore::new();
        store.set(fields::MAX_GUESTS, 8u32).unwrap();
        assert_eq!(store.number(fields::MAX_GUESTS), Some(8.0));
        assert_eq!(store.text(fields::ADDRESS), "");
    }
}
