//! Client configuration.

use bon::Builder;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_PATH: &str = "/api";

/// Header that tells a tunnelling proxy not to serve its interstitial page.
pub const SKIP_BROWSER_WARNING: &str = "ngrok-skip-browser-warning";

/// Headers sent with every request unless overridden.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(SKIP_BROWSER_WARNING),
        HeaderValue::from_static("true"),
    );
    headers
}

/// Whether cookies set by the server are kept and sent back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialPolicy {
    #[default]
    Include,
    Omit,
}

/// Endpoint paths, relative to the base path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub check_user_id: String,
    pub send_email_code: String,
    pub verify_email_code: String,
    pub signup: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            check_user_id: "/signup/check-id".to_string(),
            send_email_code: "/signup/email/send".to_string(),
            verify_email_code: "/signup/email/verify".to_string(),
            signup: "/signup".to_string(),
        }
    }
}

#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// Scheme, host and port of the API server
    #[builder(into)]
    pub base_url: String,

    #[builder(into, default = DEFAULT_BASE_PATH.to_string())]
    pub base_path: String,

    #[builder(default = default_headers())]
    pub default_headers: HeaderMap,

    #[builder(default)]
    pub credentials: CredentialPolicy,

    /// Overall request timeout. Transport defaults apply when unset.
    pub timeout: Option<Duration>,

    #[builder(default)]
    pub endpoints: EndpointConfig,
}

impl ClientConfig {
    /// `base_url` joined with `base_path`, without a trailing slash.
    pub fn api_root(&self) -> String {
        let base_url = self.base_url.trim_end_matches('/');
        let base_path = self.base_path.trim_matches('/');
        if base_path.is_empty() {
            base_url.to_string()
        } else {
            format!("{}/{}", base_url, base_path)
        }
    }
}
