//! The nine wizard steps and the predicate that gates each one.

use std::fmt;

use crate::errors::ValidationFailure;
use crate::listing::{fields, FieldStore};

/// Minimum trimmed length of the listing description, in characters.
pub const MIN_DESCRIPTION_CHARS: usize = 50;
/// Lowest accepted daily rate, in the listing currency.
pub const MIN_DAILY_RATE: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Basics = 1,
    Location,
    Capacity,
    Amenities,
    Policies,
    Pricing,
    Activities,
    Legal,
    Review,
}

impl Step {
    pub const ALL: [Step; 9] = [
        Step::Basics,
        Step::Location,
        Step::Capacity,
        Step::Amenities,
        Step::Policies,
        Step::Pricing,
        Step::Activities,
        Step::Legal,
        Step::Review,
    ];

    pub const FIRST: Step = Step::Basics;
    pub const LAST: Step = Step::Review;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Step> {
        Step::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Basics => "Basics",
            Step::Location => "Location",
            Step::Capacity => "Capacity",
            Step::Amenities => "Amenities",
            Step::Policies => "Policies",
            Step::Pricing => "Pricing",
            Step::Activities => "Activities",
            Step::Legal => "Legal",
            Step::Review => "Review",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::Basics => "Name the property, describe it, and pick its type.",
            Step::Location => "Where the property is and how guests reach the host.",
            Step::Capacity => "Rooms, beds, and how many guests fit.",
            Step::Amenities => "Facilities available to guests.",
            Step::Policies => "Check-in times, minimum stay, cancellation and payment.",
            Step::Pricing => "Daily rate and currency.",
            Step::Activities => "Things to do on site or nearby.",
            Step::Legal => "Arrival instructions, meal plans, and license details.",
            Step::Review => "Check everything before submitting.",
        }
    }

    pub fn next(self) -> Step {
        Step::from_number(self.number() + 1).unwrap_or(Step::LAST)
    }

    pub fn previous(self) -> Step {
        Step::from_number(self.number() - 1).unwrap_or(Step::FIRST)
    }

    /// Checks whether the draft satisfies this step. Pure; never panics.
    pub fn validate(self, draft: &FieldStore) -> Result<(), ValidationFailure> {
        let fail = |reason: &str| -> Result<(), ValidationFailure> {
            Err(ValidationFailure::new(self, reason))
        };
        match self {
            Step::Basics => {
                if blank(draft, fields::TITLE) {
                    return fail("a title is required");
                }
                let description = draft.text(fields::DESCRIPTION).trim().chars().count();
                if description < MIN_DESCRIPTION_CHARS {
                    return Err(ValidationFailure::new(
                        self,
                        format!(
                            "the description needs at least {MIN_DESCRIPTION_CHARS} characters ({description} so far)"
                        ),
                    ));
                }
                if blank(draft, fields::PROPERTY_TYPE) {
                    return fail("choose a property type");
                }
                Ok(())
            }
            Step::Location => {
                let missing = [
                    fields::STATE,
                    fields::CITY,
                    fields::POSTAL_CODE,
                    fields::CONTACT_PHONE,
                ]
                .into_iter()
                .find(|path| blank(draft, path));
                match missing {
                    Some(path) => Err(ValidationFailure::new(self, format!("`{path}` is required"))),
                    None => Ok(()),
                }
            }
            Step::Capacity => {
                if !draft.number(fields::MAX_GUESTS).is_some_and(|guests| guests > 0.0) {
                    return fail("maximum guests must be greater than zero");
                }
                if draft.number(fields::BEDROOMS).is_none() {
                    return fail("enter the number of bedrooms");
                }
                if draft.number(fields::BATHROOMS).is_none() {
                    return fail("enter the number of bathrooms");
                }
                Ok(())
            }
            Step::Amenities => {
                if draft.list(fields::AMENITIES).is_empty() {
                    return fail("select at least one amenity");
                }
                Ok(())
            }
            Step::Policies => {
                if blank(draft, fields::CANCELLATION_POLICY) {
                    return fail("choose a cancellation policy");
                }
                if draft.list(fields::PAYMENT_METHODS).is_empty() {
                    return fail("select at least one payment method");
                }
                Ok(())
            }
            Step::Pricing => match draft.number(fields::DAILY_RATE) {
                None => fail("a daily rate is required"),
                Some(rate) if rate < MIN_DAILY_RATE => Err(ValidationFailure::new(
                    self,
                    format!("the daily rate must be at least {MIN_DAILY_RATE}"),
                )),
                Some(_) => Ok(()),
            },
            Step::Activities => {
                if draft.list(fields::ON_SITE_ACTIVITIES).is_empty()
                    && draft.list(fields::NEARBY_ACTIVITIES).is_empty()
                {
                    return fail("add at least one on-site or nearby activity");
                }
                Ok(())
            }
            Step::Legal => {
                if blank(draft, fields::ARRIVAL_INSTRUCTIONS) {
                    return fail("arrival instructions are required");
                }
                Ok(())
            }
            Step::Review => Ok(()),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} ({})", self.number(), self.title())
    }
}

fn blank(draft: &FieldStore, path: &str) -> bool {
    draft.text(path).trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str =
        "A restored Portuguese house with a shaded verandah and a large garden.";

    #[test]
    fn numbering_round_trips() {
        for step in Step::ALL {
            assert_eq!(Step::from_number(step.number()), Some(step));
        }
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(10), None);
        assert_eq!(Step::Review.next(), Step::Review);
        assert_eq!(Step::Basics.previous(), Step::Basics);
    }

    #[test]
    fn basics_require_long_description() {
        let mut draft = FieldStore::new();
        draft.set(fields::TITLE, "Casa Azul").unwrap();
        draft.set(fields::PROPERTY_TYPE, "villa").unwrap();
        draft.set(fields::DESCRIPTION, "Too short.").unwrap();
        let failure = Step::Basics.validate(&draft).unwrap_err();
        assert_eq!(failure.step, Step::Basics);
        assert!(failure.reason.contains("50"));

        draft.set(fields::DESCRIPTION, DESCRIPTION).unwrap();
        assert!(Step::Basics.validate(&draft).is_ok());
    }

    #[test]
    fn description_length_ignores_padding() {
        let mut draft = FieldStore::new();
        draft.set(fields::TITLE, "T").unwrap();
        draft.set(fields::PROPERTY_TYPE, "villa").unwrap();
        let padded = format!("{:>60}", "x".repeat(49));
        draft.set(fields::DESCRIPTION, padded).unwrap();
        assert!(Step::Basics.validate(&draft).is_err());
    }

    #[test]
    fn capacity_accepts_zero_bathrooms_but_not_empty() {
        let mut draft = FieldStore::new();
        draft.set(fields::ROOMS_COUNT, 2u32).unwrap();
        draft.set(fields::CAPACITY_PER_ROOM, 2u32).unwrap();
        draft.set(fields::BEDROOMS, 2u32).unwrap();
        assert!(Step::Capacity.validate(&draft).is_err());
        draft.set(fields::BATHROOMS, 0u32).unwrap();
        assert!(Step::Capacity.validate(&draft).is_ok());
    }

    #[test]
    fn pricing_enforces_floor() {
        let mut draft = FieldStore::new();
        assert!(Step::Pricing.validate(&draft).is_err());
        draft.set_input(fields::DAILY_RATE, "400").unwrap();
        assert!(Step::Pricing.validate(&draft).is_err());
        draft.set_input(fields::DAILY_RATE, "500").unwrap();
        assert!(Step::Pricing.validate(&draft).is_ok());
    }

    #[test]
    fn either_activity_list_satisfies_activities() {
        let mut draft = FieldStore::new();
        assert!(Step::Activities.validate(&draft).is_err());
        draft.toggle(fields::NEARBY_ACTIVITIES, "kayaking").unwrap();
        assert!(Step::Activities.validate(&draft).is_ok());
    }

    #[test]
    fn location_reports_first_missing_field() {
        let mut draft = FieldStore::new();
        draft.set(fields::STATE, "Goa").unwrap();
        draft.set(fields::CITY, "Panaji").unwrap();
        let failure = Step::Location.validate(&draft).unwrap_err();
        assert!(failure.reason.contains("postal_code"));
    }

    #[test]
    fn review_always_passes() {
        assert!(Step::Review.validate(&FieldStore::new()).is_ok());
        assert_eq!(Step::Review.to_string(), "Step 9 (Review)");
    }
}
