//! HTTP client for the signup API.
//!
//! [`SignupClient`] is bound to one base path, sends a fixed set of default
//! headers, keeps cookies across requests and, right before each request,
//! asks its [`TokenProvider`] for a bearer token. The token is never cached.

pub mod client;
pub mod config;
pub mod error;
pub mod storage;
pub mod token;

pub use client::SignupClient;
pub use config::{
    ClientConfig, CredentialPolicy, DEFAULT_BASE_PATH, EndpointConfig, SKIP_BROWSER_WARNING,
    default_headers,
};
pub use error::{ClientError, ClientResult, StorageError, StorageResult, TokenError, TokenResult};
pub use storage::LocalStorage;
pub use token::{DEFAULT_TOKEN_KEY, NoToken, StaticTokenProvider, StorageTokenProvider, TokenProvider};
