//! Contract with the signup API server.

use crate::error::ApiResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of a successful API call. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCertification {
    pub email: String,
    pub code: String,
}

/// Wire shape of the signup request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub user_id: String,
    pub user_pw: String,
    pub email: String,
}

impl std::fmt::Debug for SignupPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupPayload")
            .field("user_id", &self.user_id)
            .field("user_pw", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

/// The four operations the signup page needs from the server.
///
/// Methods returning `Option` treat an empty (or `null`) success body as
/// `None`; callers stay silent in that case.
#[async_trait]
pub trait SignupApi: Send + Sync {
    /// Asks whether `user_id` is still available.
    async fn check_user_id(&self, user_id: &str) -> ApiResult<ApiMessage>;

    /// Sends a verification code to `email`.
    async fn send_email_code(&self, email: &str) -> ApiResult<Option<ApiMessage>>;

    async fn verify_email_code(
        &self,
        certification: &EmailCertification,
    ) -> ApiResult<Option<ApiMessage>>;

    async fn signup(&self, payload: &SignupPayload) -> ApiResult<Option<ApiMessage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_payload_wire_shape() {
        let payload = SignupPayload {
            user_id: "abc123".to_string(),
            user_pw: "password1".to_string(),
            email: "user@example.com".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userId": "abc123",
                "userPw": "password1",
                "email": "user@example.com"
            })
        );
    }

    #[test]
    fn test_payload_debug_hides_password() {
        let payload = SignupPayload {
            user_id: "abc123".to_string(),
            user_pw: "password1".to_string(),
            email: "user@example.com".to_string(),
        };
        let debug = format!("{:?}", payload);
        assert!(!debug.contains("password1"));
        assert!(debug.contains("abc123"));
    }

    #[test]
    fn test_api_message_ignores_extra_fields() {
        let message: ApiMessage =
            serde_json::from_str(r#"{"message":"사용 가능한 아이디입니다.","available":true}"#)
                .unwrap();
        assert_eq!(message.message, "사용 가능한 아이디입니다.");
    }
}
