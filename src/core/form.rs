//! # Prompt Form
//!
//! One text field and a two-state phase:
//!
//! ```text
//!   Idle ──begin_submit (valid)──▶ Submitting
//!    ▲                                │
//!    └────────── finish(_) ───────────┘
//! ```
//!
//! While submitting the field is disabled: edits and further submits are
//! dropped. `finish` always returns to idle. Only a successful exchange
//! clears the field.

use crate::core::validation::{ValidationError, validate_prompt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Default)]
pub struct PromptForm {
    value: String,
    phase: FormPhase,
    error: Option<ValidationError>,
}

impl PromptForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// The inline validation error from the last rejected submit, if any.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Replaces the field value. Returns false (and does nothing) while disabled.
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.value = value.into();
        self.error = None;
        true
    }

    /// Validates the field and, if it passes, moves to `Submitting`.
    pub fn begin_submit(&mut self) -> Result<String, ValidationError> {
        let prompt = match validate_prompt(&self.value) {
            Ok(p) => p.to_string(),
            Err(e) => {
                self.error = Some(e.clone());
                return Err(e);
            }
        };
        self.error = None;
        self.phase = FormPhase::Submitting;
        Ok(prompt)
    }

    /// Re-enables the form. A successful exchange also clears the field.
    pub fn finish(&mut self, success: bool) {
        self.phase = FormPhase::Idle;
        if success {
            self.value.clear();
        }
    }

    /// Back to a pristine form, as on page load.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
