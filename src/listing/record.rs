//! The persisted listing shape and its conversion to and from a draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::codec::{
    self, CodecWarning, DedicatedColumns, DescriptionParts, EmbeddedMetadata, StayPolicies,
};

use super::schema::fields;
use super::store::{DraftDefaults, FieldStore};
use super::value::{to_count, FieldValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    pub daily_rate: Option<f64>,
    pub currency: String,
}

/// A listing as the record store sees it. Fields without a column of their
/// own travel inside `description`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub property_subtype: String,
    pub address: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub max_guests: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub rooms_count: Option<u32>,
    pub capacity_per_room: Option<u32>,
    pub day_picnic_capacity: Option<u32>,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub on_site_activities: Vec<String>,
    pub nearby_activities: Vec<String>,
    pub pricing: Pricing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListingRecord {
    /// Assembles a record from the draft, encoding embedded fields into the
    /// description.
    pub fn from_draft(draft: &FieldStore, id: Uuid) -> Self {
        let description = codec::encode(&description_parts(draft));
        Self {
            id,
            title: draft.text(fields::TITLE).to_string(),
            description,
            property_type: draft.text(fields::PROPERTY_TYPE).to_string(),
            property_subtype: draft.text(fields::PROPERTY_SUBTYPE).to_string(),
            address: draft.text(fields::ADDRESS).to_string(),
            area: draft.text(fields::AREA).to_string(),
            city: draft.text(fields::CITY).to_string(),
            state: draft.text(fields::STATE).to_string(),
            postal_code: draft.text(fields::POSTAL_CODE).to_string(),
            country: draft.text(fields::COUNTRY).to_string(),
            max_guests: count(draft, fields::MAX_GUESTS),
            bedrooms: count(draft, fields::BEDROOMS),
            bathrooms: count(draft, fields::BATHROOMS),
            rooms_count: count(draft, fields::ROOMS_COUNT),
            capacity_per_room: count(draft, fields::CAPACITY_PER_ROOM),
            day_picnic_capacity: count(draft, fields::DAY_PICNIC_CAPACITY),
            amenities: draft.list(fields::AMENITIES).to_vec(),
            images: draft.list(fields::IMAGES).to_vec(),
            on_site_activities: draft.list(fields::ON_SITE_ACTIVITIES).to_vec(),
            nearby_activities: draft.list(fields::NEARBY_ACTIVITIES).to_vec(),
            pricing: Pricing {
                daily_rate: draft.number(fields::DAILY_RATE),
                currency: draft.text(fields::CURRENCY).to_string(),
            },
            contact_phone: non_empty(draft.text(fields::CONTACT_PHONE)),
            license_number: non_empty(draft.text(fields::LICENSE_NUMBER)),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn columns(&self) -> DedicatedColumns<'_> {
        DedicatedColumns {
            contact_phone: self.contact_phone.as_deref(),
            license_number: self.license_number.as_deref(),
        }
    }

    /// Rebuilds a draft for editing. Stored values are written verbatim,
    /// without running derivations.
    pub fn hydrate(&self, defaults: &DraftDefaults) -> (FieldStore, Vec<CodecWarning>) {
        let decoded = codec::decode(&self.description);
        let DescriptionParts {
            prose,
            policies,
            metadata,
        } = decoded.parts;
        let metadata = codec::reconcile(metadata, &self.columns());

        let mut draft = FieldStore::with_defaults(defaults);
        let texts = [
            (fields::TITLE, &self.title),
            (fields::PROPERTY_TYPE, &self.property_type),
            (fields::PROPERTY_SUBTYPE, &self.property_subtype),
            (fields::ADDRESS, &self.address),
            (fields::AREA, &self.area),
            (fields::CITY, &self.city),
            (fields::STATE, &self.state),
            (fields::POSTAL_CODE, &self.postal_code),
        ];
        for (path, value) in texts {
            draft.load(path, value.clone().into());
        }
        draft.load(fields::DESCRIPTION, prose.into());
        if !self.country.trim().is_empty() {
            draft.load(fields::COUNTRY, self.country.clone().into());
        }

        let counts = [
            (fields::MAX_GUESTS, self.max_guests),
            (fields::BEDROOMS, self.bedrooms),
            (fields::BATHROOMS, self.bathrooms),
            (fields::ROOMS_COUNT, self.rooms_count),
            (fields::CAPACITY_PER_ROOM, self.capacity_per_room),
            (fields::DAY_PICNIC_CAPACITY, self.day_picnic_capacity),
        ];
        for (path, value) in counts {
            draft.load(path, value.into());
        }

        let lists = [
            (fields::AMENITIES, &self.amenities),
            (fields::IMAGES, &self.images),
            (fields::ON_SITE_ACTIVITIES, &self.on_site_activities),
            (fields::NEARBY_ACTIVITIES, &self.nearby_activities),
        ];
        for (path, items) in lists {
            draft.load(path, items.clone().into());
        }

        draft.load(fields::DAILY_RATE, FieldValue::Number(self.pricing.daily_rate));
        if !self.pricing.currency.trim().is_empty() {
            draft.load(fields::CURRENCY, self.pricing.currency.clone().into());
        }

        load_policies(&mut draft, policies);
        draft.load(fields::CONTACT_PHONE, metadata.contact_phone.into());
        draft.load(fields::ARRIVAL_INSTRUCTIONS, metadata.arrival_instructions.into());
        draft.load(fields::MEAL_PLANS, metadata.meal_plans.into());
        draft.load(fields::LICENSE_NUMBER, metadata.license_number.into());

        info!(
            listing = %self.id,
            warnings = decoded.warnings.len(),
            "listing loaded for editing"
        );
        (draft, decoded.warnings)
    }
}

/// Splits the draft into the pieces the description codec carries.
pub fn description_parts(draft: &FieldStore) -> DescriptionParts {
    DescriptionParts {
        prose: draft.text(fields::DESCRIPTION).to_string(),
        policies: StayPolicies {
            check_in: draft.text(fields::CHECK_IN_TIME).to_string(),
            check_out: draft.text(fields::CHECK_OUT_TIME).to_string(),
            minimum_stay: count(draft, fields::MINIMUM_STAY),
            cancellation_policy: draft.text(fields::CANCELLATION_POLICY).to_string(),
            payment_methods: draft.list(fields::PAYMENT_METHODS).to_vec(),
        },
        metadata: EmbeddedMetadata {
            contact_phone: draft.text(fields::CONTACT_PHONE).to_string(),
            arrival_instructions: draft.text(fields::ARRIVAL_INSTRUCTIONS).to_string(),
            meal_plans: draft.list(fields::MEAL_PLANS).to_vec(),
            license_number: draft.text(fields::LICENSE_NUMBER).to_string(),
        },
    }
}

/// Decoded policies replace the draft defaults only where they carry a value.
fn load_policies(draft: &mut FieldStore, policies: StayPolicies) {
    if !policies.check_in.is_empty() {
        draft.load(fields::CHECK_IN_TIME, policies.check_in.into());
    }
    if !policies.check_out.is_empty() {
        draft.load(fields::CHECK_OUT_TIME, policies.check_out.into());
    }
    if let Some(nights) = policies.minimum_stay {
        draft.load(fields::MINIMUM_STAY, nights.into());
    }
    draft.load(fields::CANCELLATION_POLICY, policies.cancellation_policy.into());
    draft.load(fields::PAYMENT_METHODS, policies.payment_methods.into());
}

fn count(draft: &FieldStore, path: &str) -> Option<u32> {
    draft.number(path).map(to_count)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> FieldStore {
        let mut draft = FieldStore::new();
        draft.set(fields::TITLE, "Cashew Grove Homestay").unwrap();
        draft
            .set(fields::DESCRIPTION, "Three rooms around a courtyard.")
            .unwrap();
        draft.set(fields::PROPERTY_TYPE, "homestay").unwrap();
        draft.set(fields::CITY, "Mapusa").unwrap();
        draft.set(fields::STATE, "Goa").unwrap();
        draft.set(fields::ROOMS_COUNT, 3u32).unwrap();
        draft.set(fields::CAPACITY_PER_ROOM, 2u32).unwrap();
        draft.set(fields::CONTACT_PHONE, "+91 98220 12345").unwrap();
        draft.set(fields::LICENSE_NUMBER, "GOA-7").unwrap();
        draft.set(fields::MEAL_PLANS, vec!["breakfast"]).unwrap();
        draft.set(fields::CANCELLATION_POLICY, "moderate").unwrap();
        draft.set(fields::PAYMENT_METHODS, vec!["upi"]).unwrap();
        draft.set(fields::DAILY_RATE, 1800.0).unwrap();
        draft
    }

    #[test]
    fn from_draft_fills_columns_and_description() {
        let record = ListingRecord::from_draft(&draft(), Uuid::nil());
        assert_eq!(record.max_guests, Some(6));
        assert_eq!(record.address, "Mapusa, Goa, India");
        assert_eq!(record.contact_phone.as_deref(), Some("+91 98220 12345"));
        assert_eq!(record.pricing.currency, "INR");
        assert!(record
            .description
            .starts_with("Three rooms around a courtyard.\n\n**Property Details:**"));
        assert!(record.description.contains("Contact: +91 98220 12345"));
        assert!(record.description.ends_with("**License:** GOA-7"));
    }

    #[test]
    fn hydrate_restores_the_draft() {
        let original = draft();
        let record = ListingRecord::from_draft(&original, Uuid::new_v4());
        let (restored, warnings) = record.hydrate(&DraftDefaults::default());
        assert!(warnings.is_empty());
        assert_eq!(restored.get_all(), original.get_all());
    }

    #[test]
    fn dedicated_column_beats_embedded_contact() {
        let mut record = ListingRecord::from_draft(&draft(), Uuid::new_v4());
        record.contact_phone = Some("+91 11111 00000".into());
        let (restored, _) = record.hydrate(&DraftDefaults::default());
        assert_eq!(restored.text(fields::CONTACT_PHONE), "+91 11111 00000");
    }

    #[test]
    fn hydrate_keeps_stored_values_verbatim() {
        let record = ListingRecord {
            rooms_count: Some(4),
            capacity_per_room: Some(2),
            max_guests: Some(5),
            ..Default::default()
        };
        let (restored, _) = record.hydrate(&DraftDefaults::default());
        assert_eq!(restored.number(fields::MAX_GUESTS), Some(5.0));
        assert_eq!(restored.text(fields::COUNTRY), "India");
        assert_eq!(restored.text(fields::CHECK_IN_TIME), "14:00");
    }

    #[test]
    fn legacy_json_fills_missing_columns() {
        let record: ListingRecord =
            serde_json::from_str(r#"{"title":"Old villa","pricing":{"daily_rate":900}}"#).unwrap();
        assert_eq!(record.title, "Old villa");
        assert_eq!(record.pricing.daily_rate, Some(900.0));
        assert_eq!(record.pricing.currency, "");
        assert!(record.amenities.is_empty());
        assert_eq!(record.id, Uuid::nil());
    }
}
