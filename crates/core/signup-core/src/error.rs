//! Error types for validation, form handling and the API contract.

use crate::draft::SignupField;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;
pub type FormResult<T> = Result<T, FormError>;

/// Why a single field failed validation.
///
/// The `Display` output is the message shown under the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", .0.required_message())]
    Required(SignupField),

    #[error("아이디는 영어와 숫자가 혼합되어야 하며, {min}~{max}글자여야 합니다. (특수문자 사용 불가)")]
    IdFormat { min: usize, max: usize },

    #[error("아이디에 유효하지 않은 단어를 사용할 수 없습니다.")]
    IdForbiddenWord,

    #[error("유효한 이메일 형식을 입력해 주세요.")]
    EmailFormat,

    #[error("비밀번호가 영문, 숫자 포함 {min}자 이상이 되도록 해 주세요.")]
    PasswordFormat { min: usize },

    #[error("비밀번호가 일치하지 않습니다.")]
    PasswordMismatch,
}

/// A validation failure tied to the field it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field:?}: {error}")]
pub struct FieldError {
    pub field: SignupField,
    pub error: ValidationError,
}

/// Every field that failed during a submit attempt, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn get(&self, field: SignupField) -> Option<&ValidationError> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0:?} is not a text field")]
    NotTextField(SignupField),
}

/// Failure reported by a [`crate::SignupApi`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request rejected before sending: {0}")]
    Rejected(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty response where a message was required")]
    EmptyResponse,
}
