//! Sources of the bearer token attached to outgoing requests.

use crate::error::TokenResult;
use crate::storage::LocalStorage;

/// Storage key the login flow writes the token under.
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Supplies the bearer token for the next request.
///
/// Called once per request. `Ok(None)` means "send without Authorization";
/// an error rejects the request before it is sent.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> TokenResult<Option<String>>;
}

/// Reads the token from [`LocalStorage`] on every call.
#[derive(Debug, Clone)]
pub struct StorageTokenProvider {
    storage: LocalStorage,
    key: String,
}

impl StorageTokenProvider {
    pub fn new(storage: LocalStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl From<LocalStorage> for StorageTokenProvider {
    fn from(storage: LocalStorage) -> Self {
        Self::new(storage, DEFAULT_TOKEN_KEY)
    }
}

impl TokenProvider for StorageTokenProvider {
    fn token(&self) -> TokenResult<Option<String>> {
        let token = self.storage.get_item(&self.key)?;
        // An empty stored value counts as no token.
        Ok(token.filter(|t| !t.is_empty()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider(Option<String>);

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> TokenResult<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Never attaches a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenProvider for NoToken {
    fn token(&self) -> TokenResult<Option<String>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokenError;
    use tempfile::TempDir;

    #[test]
    fn test_storage_provider_reads_live_value() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::open(dir.path().join("storage.json"));
        let provider = StorageTokenProvider::from(storage.clone());

        assert_eq!(provider.token().unwrap(), None);

        storage.set_item(DEFAULT_TOKEN_KEY, "jwt-1").unwrap();
        assert_eq!(provider.token().unwrap().as_deref(), Some("jwt-1"));

        storage.set_item(DEFAULT_TOKEN_KEY, "jwt-2").unwrap();
        assert_eq!(provider.token().unwrap().as_deref(), Some("jwt-2"));

        storage.set_item(DEFAULT_TOKEN_KEY, "").unwrap();
        assert_eq!(provider.token().unwrap(), None);
    }

    #[test]
    fn test_storage_provider_custom_key() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::open(dir.path().join("storage.json"));
        storage.set_item("token", "wrong").unwrap();
        storage.set_item("access_token", "right").unwrap();

        let provider = StorageTokenProvider::new(storage, "access_token");
        assert_eq!(provider.token().unwrap().as_deref(), Some("right"));
    }

    #[test]
    fn test_storage_provider_surfaces_corruption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let provider = StorageTokenProvider::from(LocalStorage::open(path));
        assert!(matches!(provider.token(), Err(TokenError::Storage(_))));
    }

    #[test]
    fn test_static_and_none() {
        assert_eq!(
            StaticTokenProvider::new(Some("t".to_string())).token().unwrap(),
            Some("t".to_string())
        );
        assert_eq!(NoToken.token().unwrap(), None);
    }
}
