//! Step-gated listing wizard.

pub mod controller;
pub mod session;
pub mod steps;

pub use controller::WizardController;
pub use session::{SessionMode, WizardSession};
pub use steps::{Step, MIN_DAILY_RATE, MIN_DESCRIPTION_CHARS};
