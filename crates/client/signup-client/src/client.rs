//! reqwest-backed signup client.

use crate::config::{ClientConfig, CredentialPolicy, EndpointConfig};
use crate::error::{ClientError, ClientResult};
use crate::token::TokenProvider;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use signup_core::{ApiMessage, ApiResult, EmailCertification, SignupApi, SignupPayload};
use std::sync::Arc;
use tracing::debug;
use url::Url;

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

pub struct SignupClient {
    http: reqwest::Client,
    api_root: String,
    endpoints: EndpointConfig,
    token_provider: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for SignupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupClient")
            .field("api_root", &self.api_root)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl SignupClient {
    pub fn new(config: ClientConfig, token_provider: Arc<dyn TokenProvider>) -> ClientResult<Self> {
        let api_root = config.api_root();
        Url::parse(&api_root)?;

        let mut builder = reqwest::Client::builder().default_headers(config.default_headers);
        if config.credentials == CredentialPolicy::Include {
            builder = builder.cookie_store(true);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_root,
            endpoints: config.endpoints,
            token_provider,
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Starts a request to `path` (relative to the base path) with the
    /// current bearer token attached, if there is one.
    ///
    /// Fails without touching the network when the token provider fails.
    pub fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = format!("{}/{}", self.api_root, path.trim_start_matches('/'));
        let token = self.token_provider.token()?;
        debug!(%method, %url, authorized = token.is_some(), "Sending http request");

        let mut req = self.http.request(method, url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    pub async fn check_user_id(&self, user_id: &str) -> ClientResult<ApiMessage> {
        let response = self
            .request(Method::GET, &self.endpoints.check_user_id)?
            .query(&[("userId", user_id)])
            .send()
            .await?;
        read_message(response).await?.ok_or(ClientError::EmptyResponse)
    }

    pub async fn send_email_code(&self, email: &str) -> ClientResult<Option<ApiMessage>> {
        let response = self
            .request(Method::POST, &self.endpoints.send_email_code)?
            .json(&EmailBody { email })
            .send()
            .await?;
        read_message(response).await
    }

    pub async fn verify_email_code(
        &self,
        certification: &EmailCertification,
    ) -> ClientResult<Option<ApiMessage>> {
        let response = self
            .request(Method::POST, &self.endpoints.verify_email_code)?
            .json(certification)
            .send()
            .await?;
        read_message(response).await
    }

    pub async fn signup(&self, payload: &SignupPayload) -> ClientResult<Option<ApiMessage>> {
        let response = self
            .request(Method::POST, &self.endpoints.signup)?
            .json(payload)
            .send()
            .await?;
        read_message(response).await
    }
}

/// Non-2xx is an error; an empty or `null` 2xx body is `None`.
async fn read_message(response: Response) -> ClientResult<Option<ApiMessage>> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl SignupApi for SignupClient {
    async fn check_user_id(&self, user_id: &str) -> ApiResult<ApiMessage> {
        Ok(SignupClient::check_user_id(self, user_id).await?)
    }

    async fn send_email_code(&self, email: &str) -> ApiResult<Option<ApiMessage>> {
        Ok(SignupClient::send_email_code(self, email).await?)
    }

    async fn verify_email_code(
        &self,
        certification: &EmailCertification,
    ) -> ApiResult<Option<ApiMessage>> {
        Ok(SignupClient::verify_email_code(self, certification).await?)
    }

    async fn signup(&self, payload: &SignupPayload) -> ApiResult<Option<ApiMessage>> {
        Ok(SignupClient::signup(self, payload).await?)
    }
}
