use tracing::{debug, info};
use uuid::Uuid;

use crate::codec::{self, CodecWarning};
use crate::errors::{ListingError, Result, ValidationFailure};
use crate::listing::{record::description_parts, DraftDefaults, FieldStore, ListingRecord};
use crate::storage::RecordStore;

use super::controller::WizardController;
use super::steps::Step;

/// Whether a submit creates a new listing or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Create,
    Edit { id: Uuid },
}

impl SessionMode {
    pub fn id(self) -> Option<Uuid> {
        match self {
            SessionMode::Create => None,
            SessionMode::Edit { id } => Some(id),
        }
    }
}

/// A draft plus its step pointer. Owned by exactly one host session and
/// dropped to cancel.
#[derive(Debug, Clone)]
pub struct WizardSession {
    draft: FieldStore,
    controller: WizardController,
    mode: SessionMode,
    warnings: Vec<CodecWarning>,
}

impl WizardSession {
    /// Starts a new listing from the configured defaults.
    pub fn new(defaults: &DraftDefaults) -> Self {
        Self {
            draft: FieldStore::with_defaults(defaults),
            controller: WizardController::new(),
            mode: SessionMode::Create,
            warnings: Vec::new(),
        }
    }

    /// Opens an existing record for editing. Decode problems are kept as
    /// warnings; they never block the session.
    pub fn from_record(record: &ListingRecord, defaults: &DraftDefaults) -> Self {
        let (draft, warnings) = record.hydrate(defaults);
        Self {
            draft,
            controller: WizardController::new(),
            mode: SessionMode::Edit { id: record.id },
            warnings,
        }
    }

    pub fn open(store: &dyn RecordStore, id: Uuid, defaults: &DraftDefaults) -> Result<Self> {
        let record = store
            .fetch_by_id(id)?
            .ok_or(ListingError::RecordNotFound(id))?;
        let mut session = Self::from_record(&record, defaults);
        session.mode = SessionMode::Edit { id };
        Ok(session)
    }

    pub fn draft(&self) -> &FieldStore {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FieldStore {
        &mut self.draft
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn current(&self) -> Step {
        self.controller.current()
    }

    pub fn progress(&self) -> f64 {
        self.controller.progress()
    }

    /// Problems found while decoding the record this session was opened from.
    pub fn warnings(&self) -> &[CodecWarning] {
        &self.warnings
    }

    pub fn next(&mut self) -> std::result::Result<Step, ValidationFailure> {
        self.controller.next(&self.draft)
    }

    pub fn back(&mut self) -> Step {
        let step = self.controller.back();
        debug!(step = step.number(), "step moved back");
        step
    }

    /// The description text a submit would persist right now.
    pub fn preview_description(&self) -> String {
        codec::encode(&description_parts(&self.draft))
    }

    pub fn build_record(&self) -> ListingRecord {
        ListingRecord::from_draft(&self.draft, self.mode.id().unwrap_or_else(Uuid::nil))
    }

    /// Re-checks steps 1..8 and hands the assembled record to `store`.
    ///
    /// Any failure leaves the session exactly as it was. After a successful
    /// create the session switches to editing the new record.
    pub fn submit(&mut self, store: &dyn RecordStore) -> Result<ListingRecord> {
        let current = self.controller.current();
        if current != Step::LAST {
            return Err(ListingError::NotOnReviewStep {
                current: current.number(),
            });
        }
        for step in Step::ALL.into_iter().filter(|step| *step != Step::LAST) {
            step.validate(&self.draft)?;
        }

        let record = self.build_record();
        let saved = match self.mode {
            SessionMode::Create => store.create(record)?,
            SessionMode::Edit { id } => store.update(id, record)?,
        };

        info!(
            listing = %saved.id,
            created = self.mode == SessionMode::Create,
            "listing submitted"
        );
        self.mode = SessionMode::Edit { id: saved.id };
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::fields;
    use crate::storage::InMemoryRecordStore;

    #[test]
    fn submit_requires_review_step() {
        let mut session = WizardSession::new(&DraftDefaults::default());
        let store = InMemoryRecordStore::new();
        let err = session.submit(&store).unwrap_err();
        assert!(matches!(err, ListingError::NotOnReviewStep { current: 1 }));
        assert!(store.is_empty());
    }

    #[test]
    fn preview_reflects_embedded_fields() {
        let mut session = WizardSession::new(&DraftDefaults::default());
        session
            .draft_mut()
            .set(fields::LICENSE_NUMBER, "KL-22")
            .unwrap();
        let preview = session.preview_description();
        assert!(preview.contains("**License:** KL-22"));
        assert!(preview.contains("Check-in: 14:00 | Check-out: 11:00"));
    }

    #[test]
    fn open_missing_record_fails() {
        let store = InMemoryRecordStore::new();
        let id = Uuid::new_v4();
        let err = WizardSession::open(&store, id, &DraftDefaults::default()).unwrap_err();
        assert!(matches!(err, ListingError::RecordNotFound(missing) if missing == id));
    }
}
