pub mod json_backend;
pub mod memory;

use uuid::Uuid;

use crate::{errors::StorageError, listing::ListingRecord};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Abstraction over the service that owns persisted listings.
pub trait RecordStore: Send + Sync {
    /// Stores a new listing. The store assigns the id and timestamps.
    fn create(&self, record: ListingRecord) -> Result<ListingRecord>;
    /// Replaces the listing stored under `id`.
    fn update(&self, id: Uuid, record: ListingRecord) -> Result<ListingRecord>;
    fn fetch_by_id(&self, id: Uuid) -> Result<Option<ListingRecord>>;
}

pub use json_backend::JsonRecordStore;
pub use memory::InMemoryRecordStore;
