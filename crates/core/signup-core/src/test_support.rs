use crate::api::{ApiMessage, EmailCertification, SignupApi, SignupPayload};
use crate::error::ApiResult;
use async_trait::async_trait;
use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CheckUserId(String),
    SendEmailCode(String),
    VerifyEmailCode(EmailCertification),
    Signup(SignupPayload),
}

/// Scripted [`SignupApi`] that records every call it receives.
pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    check_reply: ApiResult<ApiMessage>,
    send_reply: ApiResult<Option<ApiMessage>>,
    verify_reply: ApiResult<Option<ApiMessage>>,
    signup_reply: ApiResult<Option<ApiMessage>>,
    hang_on: HashSet<String>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            check_reply: Ok(ApiMessage::new("ok")),
            send_reply: Ok(Some(ApiMessage::new("ok"))),
            verify_reply: Ok(Some(ApiMessage::new("ok"))),
            signup_reply: Ok(Some(ApiMessage::new("ok"))),
            hang_on: HashSet::new(),
        }
    }

    pub fn with_check_reply(mut self, reply: ApiResult<ApiMessage>) -> Self {
        self.check_reply = reply;
        self
    }

    pub fn with_send_reply(mut self, reply: ApiResult<Option<ApiMessage>>) -> Self {
        self.send_reply = reply;
        self
    }

    pub fn with_verify_reply(mut self, reply: ApiResult<Option<ApiMessage>>) -> Self {
        self.verify_reply = reply;
        self
    }

    pub fn with_signup_reply(mut self, reply: ApiResult<Option<ApiMessage>>) -> Self {
        self.signup_reply = reply;
        self
    }

    /// `check_user_id` never completes for this id.
    pub fn hang_on(mut self, user_id: &str) -> Self {
        self.hang_on.insert(user_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SignupApi for MockApi {
    async fn check_user_id(&self, user_id: &str) -> ApiResult<ApiMessage> {
        self.record(Call::CheckUserId(user_id.to_string()));
        if self.hang_on.contains(user_id) {
            std::future::pending::<()>().await;
        }
        self.check_reply.clone()
    }

    async fn send_email_code(&self, email: &str) -> ApiResult<Option<ApiMessage>> {
        self.record(Call::SendEmailCode(email.to_string()));
        self.send_reply.clone()
    }

    async fn verify_email_code(
        &self,
        certification: &EmailCertification,
    ) -> ApiResult<Option<ApiMessage>> {
        self.record(Call::VerifyEmailCode(certification.clone()));
        self.verify_reply.clone()
    }

    async fn signup(&self, payload: &SignupPayload) -> ApiResult<Option<ApiMessage>> {
        self.record(Call::Signup(payload.clone()));
        self.signup_reply.clone()
    }
}

/// Log output captured from the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's tracing events into a buffer until the guard drops.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
