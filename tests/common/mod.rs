#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use listing_core::{
    listing::{fields, DraftDefaults, FieldStore},
    storage::JsonRecordStore,
    wizard::{Step, WizardSession},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const PROSE: &str =
    "A restored Portuguese house with a shaded verandah, a large garden and a well.";

/// Creates a unique directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn json_store() -> JsonRecordStore {
    JsonRecordStore::new(temp_base()).expect("create json record store")
}

/// Fills every field the first eight steps require.
pub fn fill_complete(draft: &mut FieldStore) {
    draft.set(fields::TITLE, "Casa Azul").unwrap();
    draft.set(fields::DESCRIPTION, PROSE).unwrap();
    draft.set(fields::PROPERTY_TYPE, "homestay").unwrap();

    draft.set(fields::STATE, "Goa").unwrap();
    draft.set(fields::CITY, "Assagao").unwrap();
    draft.set(fields::POSTAL_CODE, "403507").unwrap();
    draft.set(fields::CONTACT_PHONE, "+91 98220 00000").unwrap();

    draft.set(fields::ROOMS_COUNT, 3u32).unwrap();
    draft.set(fields::CAPACITY_PER_ROOM, 2u32).unwrap();
    draft.set(fields::BEDROOMS, 3u32).unwrap();
    draft.set(fields::BATHROOMS, 2u32).unwrap();

    draft.toggle(fields::AMENITIES, "wifi").unwrap();
    draft.toggle(fields::AMENITIES, "pool").unwrap();

    draft.set(fields::CANCELLATION_POLICY, "moderate").unwrap();
    draft.toggle(fields::PAYMENT_METHODS, "cash").unwrap();
    draft.toggle(fields::PAYMENT_METHODS, "upi").unwrap();

    draft.set(fields::DAILY_RATE, 2500.0).unwrap();

    draft.toggle(fields::ON_SITE_ACTIVITIES, "yoga").unwrap();
    draft.push(fields::NEARBY_ACTIVITIES, "kayaking").unwrap();

    draft
        .set(
            fields::ARRIVAL_INSTRUCTIONS,
            "Take the lane after the chapel.\n\nCall on arrival.",
        )
        .unwrap();
    draft.toggle(fields::MEAL_PLANS, "breakfast").unwrap();
    draft.set(fields::LICENSE_NUMBER, "GOA-HOM-2231").unwrap();
}

pub fn complete_session() -> WizardSession {
    let mut session = WizardSession::new(&DraftDefaults::default());
    fill_complete(session.draft_mut());
    session
}

/// Advances through every step until the review step is reached.
pub fn walk_to_review(session: &mut WizardSession) {
    while session.current() != Step::LAST {
        let from = session.current();
        session
            .next()
            .unwrap_or_else(|failure| panic!("{from} should be complete: {failure}"));
    }
}
