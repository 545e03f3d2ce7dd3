use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::{errors::StorageError, listing::ListingRecord, utils::ensure_dir};

use super::{RecordStore, Result};

const LISTINGS_DIR: &str = "listings";
const RECORD_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// One pretty-printed JSON file per listing under `<root>/listings`.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    root: PathBuf,
    listings_dir: PathBuf,
}

impl JsonRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let listings_dir = root.join(LISTINGS_DIR);
        ensure_dir(&root)?;
        ensure_dir(&listings_dir)?;
        Ok(Self { root, listings_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, id: Uuid) -> PathBuf {
        self.listings_dir
            .join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    /// Ids of every stored listing, sorted.
    pub fn list_ids(&self) -> Result<Vec<Uuid>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.listings_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if let Ok(id) = Uuid::parse_str(stem) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn write(&self, record: &ListingRecord) -> Result<()> {
        let path = self.record_path(record.id);
        let json = serde_json::to_string_pretty(record)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        debug!(listing = %record.id, path = %path.display(), "listing written");
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<ListingRecord> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl RecordStore for JsonRecordStore {
    fn create(&self, mut record: ListingRecord) -> Result<ListingRecord> {
        let now = Utc::now();
        record.id = Uuid::new_v4();
        record.created_at = Some(now);
        record.updated_at = Some(now);
        self.write(&record)?;
        Ok(record)
    }

    fn update(&self, id: Uuid, mut record: ListingRecord) -> Result<ListingRecord> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id));
        }
        let existing = self.read(&path)?;
        record.id = id;
        record.created_at = existing.created_at;
        record.updated_at = Some(Utc::now());
        self.write(&record)?;
        Ok(record)
    }

    fn fetch_by_id(&self, id: Uuid) -> Result<Option<ListingRecord>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let mut record = self.read(&path)?;
        if record.id.is_nil() {
            record.id = id;
        }
        Ok(Some(record))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonRecordStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonRecordStore::new(temp.path()).expect("json store");
        (store, temp)
    }

    #[test]
    fn create_then_fetch_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        let created = store
            .create(ListingRecord {
                title: "Backwater houseboat".into(),
                ..Default::default()
            })
            .expect("create listing");
        assert!(store.record_path(created.id).exists());
        let fetched = store.fetch_by_id(created.id).expect("fetch listing");
        assert_eq!(fetched, Some(created));
    }

    #[test]
    fn missing_listing_is_none_and_update_fails() {
        let (store, _guard) = store_with_temp_dir();
        let id = Uuid::new_v4();
        assert_eq!(store.fetch_by_id(id).expect("fetch"), None);
        assert!(matches!(
            store.update(id, ListingRecord::default()),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn list_ids_skips_foreign_files() {
        let (store, guard) = store_with_temp_dir();
        let first = store.create(ListingRecord::default()).expect("create");
        let second = store.create(ListingRecord::default()).expect("create");
        fs::write(guard.path().join("listings").join("notes.txt"), "x").expect("write");
        fs::write(guard.path().join("listings").join("broken.json"), "{}").expect("write");
        let mut expected = vec![first.id, second.id];
        expected.sort();
        assert_eq!(store.list_ids().expect("list"), expected);
    }
}
