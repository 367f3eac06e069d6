//! Core of the signup flow: the draft, its validation rules, the per-field
//! state machine, the form controller and the async actions that talk to the
//! signup API.
//!
//! Nothing in this crate knows about HTTP. The API is reached through the
//! [`SignupApi`] trait, implemented by `signup-client`.

pub mod actions;
pub mod api;
pub mod dispatch;
pub mod draft;
pub mod error;
pub mod field;
pub mod form;
pub mod rules;

#[cfg(test)]
mod test_support;

pub use actions::{ActionKind, ActionOutcome, ActionRequest};
pub use api::{ApiMessage, EmailCertification, SignupApi, SignupPayload};
pub use dispatch::{ActionDispatcher, ActionReport, ActionReports};
pub use draft::{SignupDraft, SignupField};
pub use error::{ApiError, ApiResult, FieldError, FormError, FormErrors, FormResult, ValidationError};
pub use field::{FieldEvent, FieldState, ValidationMode};
pub use form::SignupForm;
pub use rules::{PasswordCharset, ValidationRules};
