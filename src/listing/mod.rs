//! Listing draft model: schema, typed field store, derivations, and the
//! persisted record shape.

pub mod derive;
pub mod record;
pub mod schema;
pub mod store;
pub mod value;

pub use derive::{DerivationEngine, DerivationRule};
pub use record::{ListingRecord, Pricing};
pub use schema::{fields, FieldKind, FieldSpec, Section, DAY_PICNIC};
pub use store::{DraftDefaults, FieldSnapshot, FieldStore};
pub use value::FieldValue;
