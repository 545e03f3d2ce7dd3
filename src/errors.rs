use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::listing::schema::FieldKind;
use crate::wizard::steps::Step;

/// Error type covering draft editing, wizard submission, and persistence failures.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Unknown field `{path}`{}", Suggestion(.suggestion))]
    UnknownField {
        path: String,
        suggestion: Option<&'static str>,
    },
    #[error("Field `{path}` holds {expected} values, got {found}")]
    TypeMismatch {
        path: String,
        expected: FieldKind,
        found: &'static str,
    },
    #[error("Invalid value for `{path}`: {reason}")]
    InvalidValue { path: String, reason: String },
    #[error("Derived field `{field}` is also a derivation trigger")]
    DerivationCycle { field: &'static str },
    #[error("Submit is only available on the review step (currently on step {current})")]
    NotOnReviewStep { current: u8 },
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error("Listing not found: {0}")]
    RecordNotFound(Uuid),
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

struct Suggestion<'a>(&'a Option<&'static str>);

impl fmt::Display for Suggestion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(candidate) => write!(f, " (did you mean `{candidate}`?)"),
            None => Ok(()),
        }
    }
}

/// A step predicate that did not hold. Returned to the caller, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step}: {reason}")]
pub struct ValidationFailure {
    pub step: Step,
    pub reason: String,
}

impl ValidationFailure {
    pub fn new(step: Step, reason: impl Into<String>) -> Self {
        Self {
            step,
            reason: reason.into(),
        }
    }
}

/// Failures raised by [`crate::storage::RecordStore`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Record not found: {0}")]
    NotFound(Uuid),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, ListingError>;
