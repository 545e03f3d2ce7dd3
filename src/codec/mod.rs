//! Structured-text protocol for the listing `description` column.
//!
//! Fields without a dedicated column are folded into the description as
//! marker-introduced sections and read back when a listing is edited:
//!
//! ```text
//! <user prose>
//!
//! **Property Details:**
//! Check-in: 14:00 | Check-out: 11:00
//! Minimum Stay: 2 night(s)
//! Cancellation Policy: moderate
//! Payment Methods: cash, upi
//! Contact: +91 98220 00000
//!
//! **Arrival Instructions:**
//! <free text, possibly several lines>
//!
//! **Meal Plans:** breakfast, half_board
//!
//! **License:** GOA-HOM-2231
//! ```
//!
//! Decoding never fails. A section that cannot be parsed leaves its field at
//! the default, produces a [`CodecWarning`], and keeps its raw text in the
//! clean description.

mod decode;
mod encode;
mod reader;
mod reconcile;
mod token;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use decode::decode;
pub use encode::encode;
pub use reconcile::{reconcile, DedicatedColumns};
pub use token::Marker;

/// Values that live only inside the description text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedMetadata {
    pub contact_phone: String,
    pub arrival_instructions: String,
    pub meal_plans: Vec<String>,
    pub license_number: String,
}

/// The remaining `Property Details` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPolicies {
    pub check_in: String,
    pub check_out: String,
    pub minimum_stay: Option<u32>,
    pub cancellation_policy: String,
    pub payment_methods: Vec<String>,
}

/// Everything the description column carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionParts {
    /// User-authored prose only.
    pub prose: String,
    pub policies: StayPolicies,
    pub metadata: EmbeddedMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedDescription {
    pub parts: DescriptionParts,
    pub warnings: Vec<CodecWarning>,
}

/// Non-fatal problem found while decoding one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecWarning {
    pub marker: Marker,
    pub line: usize,
    pub message: String,
}

impl CodecWarning {
    pub(crate) fn new(marker: Marker, line: usize, message: impl Into<String>) -> Self {
        Self {
            marker,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for CodecWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}): {}", self.marker, self.line, self.message)
    }
}
