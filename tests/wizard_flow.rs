mod common;

use common::{complete_session, walk_to_review, PROSE};
use listing_core::{
    errors::{ListingError, StorageError},
    listing::{fields, DraftDefaults, FieldValue, ListingRecord},
    storage::{InMemoryRecordStore, RecordStore},
    wizard::{SessionMode, Step, WizardSession},
};
use uuid::Uuid;

struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn create(&self, _record: ListingRecord) -> Result<ListingRecord, StorageError> {
        Err(StorageError::Backend("service unavailable".into()))
    }

    fn update(&self, _id: Uuid, _record: ListingRecord) -> Result<ListingRecord, StorageError> {
        Err(StorageError::Backend("service unavailable".into()))
    }

    fn fetch_by_id(&self, _id: Uuid) -> Result<Option<ListingRecord>, StorageError> {
        Ok(None)
    }
}

#[test]
fn complete_draft_walks_to_review_and_creates_a_record() {
    let store = InMemoryRecordStore::new();
    let mut session = complete_session();
    walk_to_review(&mut session);
    assert_eq!(session.progress(), 100.0);

    let saved = session.submit(&store).expect("submit");
    assert!(!saved.id.is_nil());
    assert!(saved.created_at.is_some());
    assert_eq!(saved.max_guests, Some(6));
    assert_eq!(saved.address, "Assagao, Goa, India");
    assert_eq!(saved.contact_phone.as_deref(), Some("+91 98220 00000"));
    assert_eq!(saved.license_number.as_deref(), Some("GOA-HOM-2231"));
    assert!(saved.description.starts_with(PROSE));
    assert!(saved.description.contains("**Arrival Instructions:**"));
    assert_eq!(session.mode(), SessionMode::Edit { id: saved.id });
    assert_eq!(store.len(), 1);
}

#[test]
fn second_submit_updates_the_same_record() {
    let store = InMemoryRecordStore::new();
    let mut session = complete_session();
    walk_to_review(&mut session);
    let first = session.submit(&store).unwrap();

    session.draft_mut().set(fields::TITLE, "Casa Verde").unwrap();
    let second = session.submit(&store).unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(store.len(), 1);
    let stored = store.fetch_by_id(first.id).unwrap().unwrap();
    assert_eq!(stored.title, "Casa Verde");
    assert_eq!(stored.created_at, first.created_at);
}

#[test]
fn next_is_blocked_until_the_step_is_complete() {
    let mut session = WizardSession::new(&DraftDefaults::default());
    let failure = session.next().unwrap_err();
    assert_eq!(failure.step, Step::Basics);
    assert_eq!(session.current(), Step::Basics);

    let draft = session.draft_mut();
    draft.set(fields::TITLE, "Casa Azul").unwrap();
    draft.set(fields::DESCRIPTION, "Too short").unwrap();
    draft.set(fields::PROPERTY_TYPE, "homestay").unwrap();
    let failure = session.next().unwrap_err();
    assert!(failure.reason.contains("at least 50 characters"), "{failure}");

    session.draft_mut().set(fields::DESCRIPTION, PROSE).unwrap();
    assert_eq!(session.next().unwrap(), Step::Location);
    assert_eq!(session.back(), Step::Basics);
    assert_eq!(session.back(), Step::Basics);
}

#[test]
fn submit_revalidates_every_step() {
    let store = InMemoryRecordStore::new();
    let mut session = complete_session();
    walk_to_review(&mut session);
    session
        .draft_mut()
        .set_input(fields::ARRIVAL_INSTRUCTIONS, "   ")
        .unwrap();

    let err = session.submit(&store).unwrap_err();
    match err {
        ListingError::Validation(failure) => assert_eq!(failure.step, Step::Legal),
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.is_empty());
    assert_eq!(session.current(), Step::Review);
    assert_eq!(session.mode(), SessionMode::Create);
}

#[test]
fn store_failure_keeps_the_session_intact() {
    let mut session = complete_session();
    walk_to_review(&mut session);
    let before = session.draft().get_all();

    let err = session.submit(&UnavailableStore).unwrap_err();
    assert!(matches!(err, ListingError::Persistence(StorageError::Backend(_))));
    assert_eq!(session.mode(), SessionMode::Create);
    assert_eq!(session.current(), Step::Review);
    assert_eq!(session.draft().get_all(), before);
}

#[test]
fn day_picnic_capacity_drives_max_guests() {
    let mut session = complete_session();
    let draft = session.draft_mut();
    draft.set(fields::PROPERTY_TYPE, "day_picnic").unwrap();
    draft.set(fields::DAY_PICNIC_CAPACITY, 40u32).unwrap();
    assert_eq!(draft.number(fields::MAX_GUESTS), Some(40.0));

    draft.set(fields::ROOMS_COUNT, 10u32).unwrap();
    assert_eq!(draft.number(fields::MAX_GUESTS), Some(40.0));
}

#[test]
fn edit_round_trip_restores_the_draft() {
    let store = InMemoryRecordStore::new();
    let mut session = complete_session();
    walk_to_review(&mut session);
    let saved = session.submit(&store).unwrap();

    let reopened = WizardSession::open(&store, saved.id, &DraftDefaults::default()).unwrap();
    assert!(reopened.warnings().is_empty());
    assert_eq!(reopened.current(), Step::Basics);
    assert_eq!(reopened.mode(), SessionMode::Edit { id: saved.id });
    assert_eq!(reopened.draft().get_all(), session.draft().get_all());
}

#[test]
fn dedicated_columns_win_over_embedded_values() {
    let store = InMemoryRecordStore::new();
    let mut session = complete_session();
    walk_to_review(&mut session);
    let saved = session.submit(&store).unwrap();

    let mut edited = saved.clone();
    edited.contact_phone = Some("+91 90000 11111".into());
    edited.license_number = Some("  ".into());
    store.update(saved.id, edited).unwrap();

    let reopened = WizardSession::open(&store, saved.id, &DraftDefaults::default()).unwrap();
    let draft = reopened.draft();
    assert_eq!(draft.text(fields::CONTACT_PHONE), "+91 90000 11111");
    assert_eq!(draft.text(fields::LICENSE_NUMBER), "GOA-HOM-2231");
}

#[test]
fn legacy_record_with_a_broken_section_still_opens() {
    let record = ListingRecord {
        title: "Old listing".into(),
        description: format!(
            "{PROSE}\n\n**Property Details:**\nCheck-in: whenever\nMinimum Stay: 3 nights\n\n**Meal Plans:**"
        ),
        ..ListingRecord::default()
    };
    let store = InMemoryRecordStore::new();
    let stored = store.create(record).unwrap();

    let session = WizardSession::open(&store, stored.id, &DraftDefaults::default()).unwrap();
    assert!(!session.warnings().is_empty());
    let draft = session.draft();
    assert_eq!(draft.number(fields::MINIMUM_STAY), Some(3.0));
    assert_eq!(draft.text(fields::CHECK_IN_TIME), "14:00");
    assert_eq!(draft.get(fields::MEAL_PLANS).unwrap(), FieldValue::List(Vec::new()));
    assert!(draft.text(fields::DESCRIPTION).starts_with(PROSE));
}

#[test]
fn stored_times_must_be_clock_times() {
    let record = ListingRecord {
        title: "Farm stay".into(),
        description: format!(
            "{PROSE}\n\n**Property Details:**\nCheck-in: 2pm-ish | Check-out: whenever\nContact: 98220 44444"
        ),
        ..ListingRecord::default()
    };
    let store = InMemoryRecordStore::new();
    let stored = store.create(record).unwrap();

    let session = WizardSession::open(&store, stored.id, &DraftDefaults::default()).unwrap();
    assert_eq!(session.warnings().len(), 1);
    let draft = session.draft();
    assert_eq!(draft.text(fields::CHECK_IN_TIME), "14:00");
    assert_eq!(draft.text(fields::CHECK_OUT_TIME), "11:00");
    assert_eq!(draft.text(fields::CONTACT_PHONE), "98220 44444");
    assert!(draft.text(fields::DESCRIPTION).contains("Check-in: 2pm-ish"));
}

#[test]
fn meal_plan_items_cannot_carry_the_list_separator() {
    let mut session = complete_session();
    let draft = session.draft_mut();
    assert!(draft.toggle(fields::MEAL_PLANS, "bed, breakfast").is_err());
    assert!(draft.toggle(fields::MEAL_PLANS, "bed and breakfast").unwrap());

    let store = InMemoryRecordStore::new();
    walk_to_review(&mut session);
    let saved = session.submit(&store).unwrap();
    let reopened = WizardSession::open(&store, saved.id, &DraftDefaults::default()).unwrap();
    assert_eq!(
        reopened.draft().list(fields::MEAL_PLANS),
        session.draft().list(fields::MEAL_PLANS)
    );
}
