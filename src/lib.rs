#![doc(test(attr(deny(warnings))))]

//! Listing Core holds the data-integrity layer of the property listing
//! wizard: the typed draft, its derived fields, step gating, and the codec
//! that folds structured fields into the stored description.

pub mod cli;
pub mod codec;
pub mod config;
pub mod errors;
pub mod listing;
pub mod storage;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Listing Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
