use tracing::debug;

use crate::errors::ValidationFailure;
use crate::listing::FieldStore;

use super::steps::Step;

/// Step pointer for the listing wizard. Forward moves are gated by the
/// current step's validator; backward moves never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardController {
    current: Step,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self {
            current: Step::FIRST,
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn is_on_review(&self) -> bool {
        self.current == Step::LAST
    }

    /// Advances one step when the current one validates. On failure the
    /// pointer stays put and the failure is returned.
    pub fn next(&mut self, draft: &FieldStore) -> Result<Step, ValidationFailure> {
        if let Err(failure) = self.current.validate(draft) {
            debug!(step = self.current.number(), reason = %failure.reason, "step blocked");
            return Err(failure);
        }
        let from = self.current;
        self.current = from.next();
        debug!(from = from.number(), to = self.current.number(), "step advanced");
        Ok(self.current)
    }

    pub fn back(&mut self) -> Step {
        self.current = self.current.previous();
        self.current
    }

    /// Percentage of the wizard reached. Display only.
    pub fn progress(&self) -> f64 {
        f64::from(self.current.number()) / f64::from(Step::LAST.number()) * 100.0
    }
}
