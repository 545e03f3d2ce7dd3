//! Static field schema for the listing draft.
//!
//! Every path the wizard can touch is declared here with its section and
//! value kind. Dotted paths (`pricing.daily_rate`) form nested groups that
//! can be read back as a single object.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;
use strsim::levenshtein;

/// Shape of the value stored under a field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    /// Text constrained to 24-hour `HH:MM`.
    Time,
    Number,
    /// Ordered list with append/remove-by-value semantics.
    List,
    /// Multi-select list where setting a value twice removes it again.
    ToggleList,
}

impl FieldKind {
    pub fn is_list(self) -> bool {
        matches!(self, FieldKind::List | FieldKind::ToggleList)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldKind::Text => "text",
            FieldKind::Time => "time",
            FieldKind::Number => "number",
            FieldKind::List => "list",
            FieldKind::ToggleList => "multi-select",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Identity,
    Location,
    Capacity,
    Amenities,
    Policies,
    Pricing,
    Activities,
    Legal,
    Media,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Identity => "Identity",
            Section::Location => "Location",
            Section::Capacity => "Capacity",
            Section::Amenities => "Amenities",
            Section::Policies => "Policies",
            Section::Pricing => "Pricing",
            Section::Activities => "Activities",
            Section::Legal => "Legal",
            Section::Media => "Media",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub path: &'static str,
    pub label: &'static str,
    pub section: Section,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(path: &'static str, label: &'static str, section: Section, kind: FieldKind) -> Self {
        Self {
            path,
            label,
            section,
            kind,
        }
    }
}

/// Field path constants.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const PROPERTY_TYPE: &str = "property_type";
    pub const PROPERTY_SUBTYPE: &str = "property_subtype";

    pub const COUNTRY: &str = "country";
    pub const STATE: &str = "state";
    pub const CITY: &str = "city";
    pub const AREA: &str = "area";
    pub const ADDRESS: &str = "address";
    pub const POSTAL_CODE: &str = "postal_code";
    pub const CONTACT_PHONE: &str = "contact_phone";

    pub const ROOMS_COUNT: &str = "rooms_count";
    pub const CAPACITY_PER_ROOM: &str = "capacity_per_room";
    pub const DAY_PICNIC_CAPACITY: &str = "day_picnic_capacity";
    pub const MAX_GUESTS: &str = "max_guests";
    pub const BEDROOMS: &str = "bedrooms";
    pub const BATHROOMS: &str = "bathrooms";

    pub const AMENITIES: &str = "amenities";

    pub const CHECK_IN_TIME: &str = "check_in_time";
    pub const CHECK_OUT_TIME: &str = "check_out_time";
    pub const MINIMUM_STAY: &str = "minimum_stay";
    pub const CANCELLATION_POLICY: &str = "cancellation_policy";
    pub const PAYMENT_METHODS: &str = "payment_methods";

    pub const DAILY_RATE: &str = "pricing.daily_rate";
    pub const CURRENCY: &str = "pricing.currency";

    pub const ON_SITE_ACTIVITIES: &str = "activities.on_site";
    pub const NEARBY_ACTIVITIES: &str = "activities.nearby";

    pub const ARRIVAL_INSTRUCTIONS: &str = "arrival_instructions";
    pub const MEAL_PLANS: &str = "meal_plans";
    pub const LICENSE_NUMBER: &str = "license_number";

    pub const IMAGES: &str = "images";
}

/// Property type whose capacity is a single head count instead of rooms.
pub const DAY_PICNIC: &str = "day_picnic";

use fields::*;
use FieldKind::*;

pub static SCHEMA: &[FieldSpec] = &[
    FieldSpec::new(TITLE, "Title", Section::Identity, Text),
    FieldSpec::new(DESCRIPTION, "Description", Section::Identity, Text),
    FieldSpec::new(PROPERTY_TYPE, "Property type", Section::Identity, Text),
    FieldSpec::new(PROPERTY_SUBTYPE, "Property subtype", Section::Identity, Text),
    FieldSpec::new(COUNTRY, "Country", Section::Location, Text),
    FieldSpec::new(STATE, "State", Section::Location, Text),
    FieldSpec::new(CITY, "City", Section::Location, Text),
    FieldSpec::new(AREA, "Area", Section::Location, Text),
    FieldSpec::new(ADDRESS, "Address", Section::Location, Text),
    FieldSpec::new(POSTAL_CODE, "Postal code", Section::Location, Text),
    FieldSpec::new(CONTACT_PHONE, "Contact phone", Section::Location, Text),
    FieldSpec::new(ROOMS_COUNT, "Rooms", Section::Capacity, Number),
    FieldSpec::new(CAPACITY_PER_ROOM, "Guests per room", Section::Capacity, Number),
    FieldSpec::new(DAY_PICNIC_CAPACITY, "Day picnic capacity", Section::Capacity, Number),
    FieldSpec::new(MAX_GUESTS, "Maximum guests", Section::Capacity, Number),
    FieldSpec::new(BEDROOMS, "Bedrooms", Section::Capacity, Number),
    FieldSpec::new(BATHROOMS, "Bathrooms", Section::Capacity, Number),
    FieldSpec::new(AMENITIES, "Amenities", Section::Amenities, ToggleList),
    FieldSpec::new(CHECK_IN_TIME, "Check-in time", Section::Policies, Time),
    FieldSpec::new(CHECK_OUT_TIME, "Check-out time", Section::Policies, Time),
    FieldSpec::new(MINIMUM_STAY, "Minimum stay (nights)", Section::Policies, Number),
    FieldSpec::new(CANCELLATION_POLICY, "Cancellation policy", Section::Policies, Text),
    FieldSpec::new(PAYMENT_METHODS, "Payment methods", Section::Policies, ToggleList),
    FieldSpec::new(DAILY_RATE, "Daily rate", Section::Pricing, Number),
    FieldSpec::new(CURRENCY, "Currency", Section::Pricing, Text),
    FieldSpec::new(ON_SITE_ACTIVITIES, "On-site activities", Section::Activities, ToggleList),
    FieldSpec::new(NEARBY_ACTIVITIES, "Nearby activities", Section::Activities, ToggleList),
    FieldSpec::new(ARRIVAL_INSTRUCTIONS, "Arrival instructions", Section::Legal, Text),
    FieldSpec::new(MEAL_PLANS, "Meal plans", Section::Legal, ToggleList),
    FieldSpec::new(LICENSE_NUMBER, "License number", Section::Legal, Text),
    FieldSpec::new(IMAGES, "Images", Section::Media, List),
];

static INDEX: Lazy<HashMap<&'static str, &'static FieldSpec>> =
    Lazy::new(|| SCHEMA.iter().map(|spec| (spec.path, spec)).collect());

pub fn lookup(path: &str) -> Option<&'static FieldSpec> {
    INDEX.get(path).copied()
}

/// Returns true when `path` is the prefix of one or more dotted field paths.
pub fn is_group(path: &str) -> bool {
    !path.is_empty()
        && SCHEMA.iter().any(|spec| {
            spec.path
                .strip_prefix(path)
                .is_some_and(|rest| rest.starts_with('.'))
        })
}

/// Closest known path to `input`, if any is within a small edit distance.
pub fn suggest(input: &str) -> Option<&'static str> {
    SCHEMA
        .iter()
        .map(|spec| (levenshtein(spec.path, input), spec.path))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, path)| path)
}
