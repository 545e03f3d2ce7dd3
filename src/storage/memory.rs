use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::{errors::StorageError, listing::ListingRecord};

use super::{RecordStore, Result};

/// Process-local store, mainly for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<BTreeMap<Uuid, ListingRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_records<T>(&self, f: impl FnOnce(&mut BTreeMap<Uuid, ListingRecord>) -> T) -> Result<T> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StorageError::Backend("record store lock poisoned".into()))?;
        Ok(f(&mut records))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create(&self, mut record: ListingRecord) -> Result<ListingRecord> {
        let now = Utc::now();
        record.id = Uuid::new_v4();
        record.created_at = Some(now);
        record.updated_at = Some(now);
        self.with_records(|records| {
            records.insert(record.id, record.clone());
            record
        })
    }

    fn update(&self, id: Uuid, mut record: ListingRecord) -> Result<ListingRecord> {
        self.with_records(|records| {
            let existing = records.get_mut(&id).ok_or(StorageError::NotFound(id))?;
            record.id = id;
            record.created_at = existing.created_at;
            record.updated_at = Some(Utc::now());
            *existing = record.clone();
            Ok(record)
        })?
    }

    fn fetch_by_id(&self, id: Uuid) -> Result<Option<ListingRecord>> {
        self.with_records(|records| records.get(&id).cloned())
    }
}
