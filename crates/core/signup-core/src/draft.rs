//! The in-memory signup draft and the fields it is made of.

use crate::api::{EmailCertification, SignupPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignupField {
    Id,
    Email,
    EmailConfirm,
    Password,
    PasswordConfirm,
    Agree,
}

impl SignupField {
    /// All fields in form order.
    pub const ALL: [SignupField; 6] = [
        SignupField::Id,
        SignupField::Email,
        SignupField::EmailConfirm,
        SignupField::Password,
        SignupField::PasswordConfirm,
        SignupField::Agree,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            SignupField::Id => 0,
            SignupField::Email => 1,
            SignupField::EmailConfirm => 2,
            SignupField::Password => 3,
            SignupField::PasswordConfirm => 4,
            SignupField::Agree => 5,
        }
    }

    pub fn is_text(self) -> bool {
        !matches!(self, SignupField::Agree)
    }

    /// Input values that should be masked when rendered.
    pub fn is_secret(self) -> bool {
        matches!(self, SignupField::Password | SignupField::PasswordConfirm)
    }

    pub fn label(self) -> &'static str {
        match self {
            SignupField::Id => "아이디",
            SignupField::Email => "이메일",
            SignupField::EmailConfirm => "인증번호",
            SignupField::Password => "비밀번호",
            SignupField::PasswordConfirm => "비밀번호 확인",
            SignupField::Agree => "개인정보 수집 및 이용약관에 동의합니다.",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            SignupField::Id => "아이디를 입력해 주세요.",
            SignupField::Email => "이메일을 입력해 주세요.",
            SignupField::EmailConfirm => "인증번호를 입력해 주세요.",
            SignupField::Password => "비밀번호를 입력해 주세요.",
            SignupField::PasswordConfirm => "비밀번호를 한 번 더 입력해 주세요.",
            SignupField::Agree => "",
        }
    }

    pub fn required_message(self) -> &'static str {
        match self {
            SignupField::Id => "아이디를 입력해 주세요.",
            SignupField::Email => "이메일을 입력해 주세요.",
            SignupField::EmailConfirm => "인증번호를 입력해 주세요.",
            SignupField::Password => "비밀번호를 입력해 주세요.",
            SignupField::PasswordConfirm => "비밀번호를 확인해 주세요.",
            SignupField::Agree => "개인정보 수집 및 이용약관에 동의해 주세요.",
        }
    }
}

/// Not-yet-submitted signup form state. Lives only as long as the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupDraft {
    pub id: String,
    pub email: String,
    pub email_confirm: String,
    pub password: String,
    pub password_confirm: String,
    pub agree: bool,
}

impl SignupDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of `field`, or `None` for the agreement checkbox.
    pub fn text(&self, field: SignupField) -> Option<&str> {
        match field {
            SignupField::Id => Some(&self.id),
            SignupField::Email => Some(&self.email),
            SignupField::EmailConfirm => Some(&self.email_confirm),
            SignupField::Password => Some(&self.password),
            SignupField::PasswordConfirm => Some(&self.password_confirm),
            SignupField::Agree => None,
        }
    }

    pub fn text_mut(&mut self, field: SignupField) -> Option<&mut String> {
        match field {
            SignupField::Id => Some(&mut self.id),
            SignupField::Email => Some(&mut self.email),
            SignupField::EmailConfirm => Some(&mut self.email_confirm),
            SignupField::Password => Some(&mut self.password),
            SignupField::PasswordConfirm => Some(&mut self.password_confirm),
            SignupField::Agree => None,
        }
    }

    pub fn to_payload(&self) -> SignupPayload {
        SignupPayload {
            user_id: self.id.clone(),
            user_pw: self.password.clone(),
            email: self.email.clone(),
        }
    }

    pub fn email_certification(&self) -> EmailCertification {
        EmailCertification {
            email: self.email.clone(),
            code: self.email_confirm.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_maps_draft_fields() {
        let draft = SignupDraft {
            id: "abc123".to_string(),
            email: "user@example.com".to_string(),
            email_confirm: "918273".to_string(),
            password: "password1".to_string(),
            password_confirm: "password1".to_string(),
            agree: true,
        };

        let payload = draft.to_payload();
        assert_eq!(payload.user_id, "abc123");
        assert_eq!(payload.user_pw, "password1");
        assert_eq!(payload.email, "user@example.com");

        let cert = draft.email_certification();
        assert_eq!(cert.email, "user@example.com");
        assert_eq!(cert.code, "918273");
    }

    #[test]
    fn test_agree_has_no_text() {
        let mut draft = SignupDraft::new();
        assert!(draft.text(SignupField::Agree).is_none());
        assert!(draft.text_mut(SignupField::Agree).is_none());
        assert!(!SignupField::Agree.is_text());
    }

    #[test]
    fn test_field_indices_follow_form_order() {
        for (i, field) in SignupField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }
}
