//! Client error types.

use signup_core::ApiError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;
pub type StorageResult<T> = Result<T, StorageError>;
pub type TokenResult<T> = Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No local data directory available on this platform")]
    NoDataDir,

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to read token: {0}")]
    Storage(#[from] StorageError),

    #[error("Token unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token provider failed; the request was never sent.
    #[error("Request rejected: {0}")]
    Token(#[from] TokenError),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Empty response where a message was required")]
    EmptyResponse,
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => ApiError::Request(e.to_string()),
            ClientError::Token(e) => ApiError::Rejected(e.to_string()),
            ClientError::InvalidUrl(e) => ApiError::Request(e.to_string()),
            ClientError::Status { status, body } => ApiError::Status { status, body },
            ClientError::InvalidResponse(e) => ApiError::InvalidResponse(e.to_string()),
            ClientError::EmptyResponse => ApiError::EmptyResponse,
        }
    }
}
