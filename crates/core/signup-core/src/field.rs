//! Per-field validation state machine.
//!
//! A field starts `Untouched`. Input events move it to `Valid` or
//! `Invalid(reason)` whenever the active [`ValidationMode`] says the event
//! should trigger validation; otherwise the state is left as it was.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Untouched,
    Valid,
    Invalid(ValidationError),
}

impl FieldState {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldState::Valid)
    }

    pub fn is_untouched(&self) -> bool {
        matches!(self, FieldState::Untouched)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            FieldState::Invalid(error) => Some(error),
            _ => None,
        }
    }

    /// Applies `event` and returns whether the state was re-evaluated.
    ///
    /// `validate` is only called when the event triggers validation.
    pub fn on_event<F>(
        &mut self,
        event: FieldEvent,
        mode: ValidationMode,
        submitted: bool,
        validate: F,
    ) -> bool
    where
        F: FnOnce() -> Result<(), ValidationError>,
    {
        if !mode.triggers(event, submitted) {
            return false;
        }
        *self = match validate() {
            Ok(()) => FieldState::Valid,
            Err(error) => FieldState::Invalid(error),
        };
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// The value was edited.
    Change,
    /// Focus left the field.
    Blur,
    /// The form is being submitted.
    Submit,
}

/// When validation runs before the first submit attempt.
///
/// After a submit attempt every change re-validates, whatever the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    #[default]
    OnSubmit,
    OnChange,
    OnBlur,
    All,
}

impl ValidationMode {
    pub fn triggers(self, event: FieldEvent, submitted: bool) -> bool {
        match event {
            FieldEvent::Submit => true,
            FieldEvent::Change => {
                submitted || matches!(self, ValidationMode::OnChange | ValidationMode::All)
            }
            FieldEvent::Blur => matches!(self, ValidationMode::OnBlur | ValidationMode::All),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::SignupField;

    fn fail() -> Result<(), ValidationError> {
        Err(ValidationError::Required(SignupField::Id))
    }

    #[test]
    fn test_on_submit_mode_ignores_change_and_blur_before_submit() {
        let mut state = FieldState::default();
        assert!(!state.on_event(FieldEvent::Change, ValidationMode::OnSubmit, false, fail));
        assert!(!state.on_event(FieldEvent::Blur, ValidationMode::OnSubmit, false, fail));
        assert!(state.is_untouched());

        assert!(state.on_event(FieldEvent::Submit, ValidationMode::OnSubmit, false, fail));
        assert_eq!(
            state.error(),
            Some(&ValidationError::Required(SignupField::Id))
        );
    }

    #[test]
    fn test_change_revalidates_after_submit() {
        let mut state = FieldState::Invalid(ValidationError::EmailFormat);
        assert!(state.on_event(FieldEvent::Change, ValidationMode::OnSubmit, true, || Ok(())));
        assert!(state.is_valid());
    }

    #[test]
    fn test_blur_mode() {
        let mut state = FieldState::default();
        assert!(!state.on_event(FieldEvent::Change, ValidationMode::OnBlur, false, fail));
        assert!(state.on_event(FieldEvent::Blur, ValidationMode::OnBlur, false, fail));
        assert!(state.error().is_some());
    }

    #[test]
    fn test_all_mode_triggers_everything() {
        for event in [FieldEvent::Change, FieldEvent::Blur, FieldEvent::Submit] {
            assert!(ValidationMode::All.triggers(event, false));
        }
    }

    #[test]
    fn test_validate_not_called_when_not_triggered() {
        let mut state = FieldState::Valid;
        let mut called = false;
        state.on_event(FieldEvent::Blur, ValidationMode::OnChange, false, || {
            called = true;
            Ok(())
        });
        assert!(!called);
        assert!(state.is_valid());
    }
}
