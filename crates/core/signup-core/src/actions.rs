//! The four one-shot actions behind the signup page's buttons.
//!
//! Each action checks its own local precondition, makes a single API call and
//! turns the result into an [`ActionOutcome`]. API failures are logged and
//! swallowed: the user sees nothing for them. No action retries.

use crate::api::{EmailCertification, SignupApi, SignupPayload};
use crate::draft::{SignupDraft, SignupField};
use crate::error::ApiError;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CheckUserId,
    SendEmailCode,
    VerifyEmailCode,
    SubmitSignup,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::CheckUserId,
        ActionKind::SendEmailCode,
        ActionKind::VerifyEmailCode,
        ActionKind::SubmitSignup,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ActionKind::CheckUserId => 0,
            ActionKind::SendEmailCode => 1,
            ActionKind::VerifyEmailCode => 2,
            ActionKind::SubmitSignup => 3,
        }
    }

    /// Context label written to the log when the API call fails.
    pub fn failure_label(self) -> &'static str {
        match self {
            ActionKind::CheckUserId => "중복확인 중 에러 발생",
            ActionKind::SendEmailCode => "인증번호 전송 중 에러 발생",
            ActionKind::VerifyEmailCode => "인증번호 확인 중 에러 발생",
            ActionKind::SubmitSignup => "회원가입 중 에러 발생",
        }
    }

    /// Caption of the button that triggers the action.
    pub fn button_label(self) -> &'static str {
        match self {
            ActionKind::CheckUserId => "중복확인",
            ActionKind::SendEmailCode => "인증번호 전송",
            ActionKind::VerifyEmailCode => "인증하기",
            ActionKind::SubmitSignup => "가입하기",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A required value was missing; no request was made.
    Prompt(String),
    /// The server answered with a message for the user.
    Alert(String),
    /// The server answered with an empty body.
    Silent,
    /// The request failed. It has been logged and is not shown.
    Failed,
}

impl ActionOutcome {
    /// Text to surface to the user, if any.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            ActionOutcome::Prompt(message) | ActionOutcome::Alert(message) => Some(message),
            ActionOutcome::Silent | ActionOutcome::Failed => None,
        }
    }
}

/// An action together with the field values it was triggered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    CheckUserId { user_id: String },
    SendEmailCode { email: String },
    VerifyEmailCode(EmailCertification),
    SubmitSignup(SignupPayload),
}

impl ActionRequest {
    pub fn check_user_id(draft: &SignupDraft) -> Self {
        ActionRequest::CheckUserId {
            user_id: draft.id.clone(),
        }
    }

    pub fn send_email_code(draft: &SignupDraft) -> Self {
        ActionRequest::SendEmailCode {
            email: draft.email.clone(),
        }
    }

    pub fn verify_email_code(draft: &SignupDraft) -> Self {
        ActionRequest::VerifyEmailCode(draft.email_certification())
    }

    /// Takes a payload produced by [`crate::SignupForm::handle_submit`].
    pub fn submit_signup(payload: SignupPayload) -> Self {
        ActionRequest::SubmitSignup(payload)
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::CheckUserId { .. } => ActionKind::CheckUserId,
            ActionRequest::SendEmailCode { .. } => ActionKind::SendEmailCode,
            ActionRequest::VerifyEmailCode(_) => ActionKind::VerifyEmailCode,
            ActionRequest::SubmitSignup(_) => ActionKind::SubmitSignup,
        }
    }
}

fn failed(kind: ActionKind, err: &ApiError) -> ActionOutcome {
    error!(action = ?kind, error = %err, "{}", kind.failure_label());
    ActionOutcome::Failed
}

fn prompt(field: SignupField) -> ActionOutcome {
    ActionOutcome::Prompt(field.required_message().to_string())
}

pub async fn check_user_id(api: &dyn SignupApi, user_id: &str) -> ActionOutcome {
    if user_id.is_empty() {
        return prompt(SignupField::Id);
    }
    debug!(user_id, "Checking user id availability");
    match api.check_user_id(user_id).await {
        Ok(result) => ActionOutcome::Alert(result.message),
        Err(err) => failed(ActionKind::CheckUserId, &err),
    }
}

pub async fn send_email_code(api: &dyn SignupApi, email: &str) -> ActionOutcome {
    if email.is_empty() {
        return prompt(SignupField::Email);
    }
    debug!(email, "Requesting verification code");
    match api.send_email_code(email).await {
        Ok(Some(result)) => ActionOutcome::Alert(result.message),
        Ok(None) => ActionOutcome::Silent,
        Err(err) => failed(ActionKind::SendEmailCode, &err),
    }
}

/// Only the code is required locally; the email is sent as-is.
pub async fn verify_email_code(
    api: &dyn SignupApi,
    certification: &EmailCertification,
) -> ActionOutcome {
    if certification.code.is_empty() {
        return prompt(SignupField::EmailConfirm);
    }
    debug!(email = %certification.email, "Verifying email code");
    match api.verify_email_code(certification).await {
        Ok(Some(result)) => ActionOutcome::Alert(result.message),
        Ok(None) => ActionOutcome::Silent,
        Err(err) => failed(ActionKind::VerifyEmailCode, &err),
    }
}

pub async fn submit_signup(api: &dyn SignupApi, payload: &SignupPayload) -> ActionOutcome {
    debug!(user_id = %payload.user_id, "Submitting signup");
    match api.signup(payload).await {
        Ok(Some(result)) => ActionOutcome::Alert(result.message),
        Ok(None) => ActionOutcome::Silent,
        Err(err) => failed(ActionKind::SubmitSignup, &err),
    }
}

pub async fn run(api: &dyn SignupApi, request: &ActionRequest) -> ActionOutcome {
    match request {
        ActionRequest::CheckUserId { user_id } => check_user_id(api, user_id).await,
        ActionRequest::SendEmailCode { email } => send_email_code(api, email).await,
        ActionRequest::VerifyEmailCode(certification) => {
            verify_email_code(api, certification).await
        }
        ActionRequest::SubmitSignup(payload) => submit_signup(api, payload).await,
    }
}
