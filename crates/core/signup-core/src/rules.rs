//! Local validation rules for each signup field.
//!
//! Every check here is a pure function of the draft; nothing touches the
//! network. The required check runs first, then the field's own rules in
//! order, and the first failure is reported.

use crate::draft::{SignupDraft, SignupField};
use crate::error::ValidationError;
use bon::Builder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("alphanumeric pattern is valid"));

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

/// Characters a password may contain besides the mandatory letter and digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordCharset {
    /// Any character is accepted.
    #[default]
    AllowSymbols,
    /// Only ASCII letters and digits.
    AlphanumericOnly,
}

#[derive(Debug, Clone, Builder)]
pub struct ValidationRules {
    /// Substrings an id may not contain, compared case-insensitively.
    #[builder(default = default_forbidden_words())]
    pub forbidden_words: Vec<String>,

    #[builder(default = 6)]
    pub id_min_len: usize,

    #[builder(default = 12)]
    pub id_max_len: usize,

    #[builder(default = 8)]
    pub password_min_len: usize,

    #[builder(default)]
    pub password_charset: PasswordCharset,
}

fn default_forbidden_words() -> Vec<String> {
    vec!["admin".to_string(), "fuck".to_string()]
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            forbidden_words: default_forbidden_words(),
            id_min_len: 6,
            id_max_len: 12,
            password_min_len: 8,
            password_charset: PasswordCharset::default(),
        }
    }
}

fn has_letter_and_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_alphabetic()) && value.chars().any(|c| c.is_ascii_digit())
}

fn required(field: SignupField, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

impl ValidationRules {
    pub fn validate_id(&self, value: &str) -> Result<(), ValidationError> {
        required(SignupField::Id, value)?;

        // Charset is ASCII once the pattern matches, so byte length is char length.
        let well_formed = ALPHANUMERIC.is_match(value)
            && (self.id_min_len..=self.id_max_len).contains(&value.len())
            && has_letter_and_digit(value);
        if !well_formed {
            return Err(ValidationError::IdFormat {
                min: self.id_min_len,
                max: self.id_max_len,
            });
        }

        let lowered = value.to_lowercase();
        if self
            .forbidden_words
            .iter()
            .any(|word| !word.is_empty() && lowered.contains(&word.to_lowercase()))
        {
            return Err(ValidationError::IdForbiddenWord);
        }

        Ok(())
    }

    pub fn validate_email(&self, value: &str) -> Result<(), ValidationError> {
        required(SignupField::Email, value)?;
        if !EMAIL.is_match(value) {
            return Err(ValidationError::EmailFormat);
        }
        Ok(())
    }

    pub fn validate_email_confirm(&self, value: &str) -> Result<(), ValidationError> {
        required(SignupField::EmailConfirm, value)
    }

    pub fn validate_password(&self, value: &str) -> Result<(), ValidationError> {
        required(SignupField::Password, value)?;

        let charset_ok = match self.password_charset {
            PasswordCharset::AllowSymbols => true,
            PasswordCharset::AlphanumericOnly => ALPHANUMERIC.is_match(value),
        };
        if !charset_ok
            || value.chars().count() < self.password_min_len
            || !has_letter_and_digit(value)
        {
            return Err(ValidationError::PasswordFormat {
                min: self.password_min_len,
            });
        }
        Ok(())
    }

    pub fn validate_password_confirm(
        &self,
        value: &str,
        password: &str,
    ) -> Result<(), ValidationError> {
        required(SignupField::PasswordConfirm, value)?;
        if value != password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    pub fn validate_agree(&self, agree: bool) -> Result<(), ValidationError> {
        if agree {
            Ok(())
        } else {
            Err(ValidationError::Required(SignupField::Agree))
        }
    }

    /// Validates `field` against the current contents of `draft`.
    pub fn validate_field(
        &self,
        field: SignupField,
        draft: &SignupDraft,
    ) -> Result<(), ValidationError> {
        match field {
            SignupField::Id => self.validate_id(&draft.id),
            SignupField::Email => self.validate_email(&draft.email),
            SignupField::EmailConfirm => self.validate_email_confirm(&draft.email_confirm),
            SignupField::Password => self.validate_password(&draft.password),
            SignupField::PasswordConfirm => {
                self.validate_password_confirm(&draft.password_confirm, &draft.password)
            }
            SignupField::Agree => self.validate_agree(draft.agree),
        }
    }
}
