//! Signup form controller.

use crate::api::SignupPayload;
use crate::draft::{SignupDraft, SignupField};
use crate::error::{FieldError, FormError, FormErrors, FormResult, ValidationError};
use crate::field::{FieldEvent, FieldState, ValidationMode};
use crate::rules::ValidationRules;
use tracing::debug;

/// Holds the draft plus one [`FieldState`] per field and drives validation.
///
/// Per-field states are advisory. The only enforcement point is
/// [`SignupForm::handle_submit`], which refuses to produce a payload unless
/// every field, including the agreement checkbox, validates.
#[derive(Debug, Clone)]
pub struct SignupForm {
    draft: SignupDraft,
    states: [FieldState; 6],
    rules: ValidationRules,
    mode: ValidationMode,
    submitted: bool,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self::new(ValidationRules::default(), ValidationMode::default())
    }
}

impl SignupForm {
    pub fn new(rules: ValidationRules, mode: ValidationMode) -> Self {
        Self {
            draft: SignupDraft::new(),
            states: Default::default(),
            rules,
            mode,
            submitted: false,
        }
    }

    pub fn draft(&self) -> &SignupDraft {
        &self.draft
    }

    /// Owned copy of the current values, for handing to an async action.
    pub fn snapshot(&self) -> SignupDraft {
        self.draft.clone()
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Whether a submit has been attempted since the last reset.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Current value of a text field. Empty for the checkbox.
    pub fn value(&self, field: SignupField) -> &str {
        self.draft.text(field).unwrap_or_default()
    }

    pub fn agree(&self) -> bool {
        self.draft.agree
    }

    pub fn state(&self, field: SignupField) -> &FieldState {
        &self.states[field.index()]
    }

    pub fn error(&self, field: SignupField) -> Option<&ValidationError> {
        self.state(field).error()
    }

    /// True when every field is currently in the `Valid` state.
    pub fn is_valid(&self) -> bool {
        self.states.iter().all(FieldState::is_valid)
    }

    pub fn set_value(&mut self, field: SignupField, value: impl Into<String>) -> FormResult<()> {
        let slot = self
            .draft
            .text_mut(field)
            .ok_or(FormError::NotTextField(field))?;
        *slot = value.into();
        self.changed(field);
        Ok(())
    }

    pub fn push_char(&mut self, field: SignupField, c: char) -> FormResult<()> {
        self.draft
            .text_mut(field)
            .ok_or(FormError::NotTextField(field))?
            .push(c);
        self.changed(field);
        Ok(())
    }

    pub fn pop_char(&mut self, field: SignupField) -> FormResult<()> {
        let popped = self
            .draft
            .text_mut(field)
            .ok_or(FormError::NotTextField(field))?
            .pop();
        if popped.is_some() {
            self.changed(field);
        }
        Ok(())
    }

    pub fn set_agree(&mut self, agree: bool) {
        self.draft.agree = agree;
        self.changed(SignupField::Agree);
    }

    pub fn toggle_agree(&mut self) {
        self.set_agree(!self.draft.agree);
    }

    pub fn blur(&mut self, field: SignupField) {
        self.fire(field, FieldEvent::Blur);
    }

    /// Validates every field and returns the signup payload if all pass.
    pub fn handle_submit(&mut self) -> Result<SignupPayload, FormErrors> {
        self.submitted = true;
        for field in SignupField::ALL {
            self.fire(field, FieldEvent::Submit);
        }

        let errors: Vec<FieldError> = SignupField::ALL
            .iter()
            .filter_map(|&field| {
                self.error(field).map(|error| FieldError {
                    field,
                    error: error.clone(),
                })
            })
            .collect();

        if errors.is_empty() {
            Ok(self.draft.to_payload())
        } else {
            debug!(failed = errors.len(), "Signup form rejected on submit");
            Err(FormErrors { errors })
        }
    }

    /// Discards the draft and every field state.
    pub fn reset(&mut self) {
        self.draft = SignupDraft::new();
        self.states = Default::default();
        self.submitted = false;
    }

    fn changed(&mut self, field: SignupField) {
        self.fire(field, FieldEvent::Change);

        // The confirmation compares against the live password, so keep it in step.
        if field == SignupField::Password && !self.state(SignupField::PasswordConfirm).is_untouched()
        {
            let outcome = self.rules.validate_field(SignupField::PasswordConfirm, &self.draft);
            self.states[SignupField::PasswordConfirm.index()] = match outcome {
                Ok(()) => FieldState::Valid,
                Err(error) => FieldState::Invalid(error),
            };
        }
    }

    fn fire(&mut self, field: SignupField, event: FieldEvent) {
        let Self {
            draft,
            states,
            rules,
            mode,
            submitted,
        } = self;
        states[field.index()].on_event(event, *mode, *submitted, || {
            rules.validate_field(field, draft)
        });
    }
}
