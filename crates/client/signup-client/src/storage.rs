//! Persistent string key/value storage backed by a JSON file.

use crate::error::{StorageError, StorageResult};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed key/value store, the desktop stand-in for browser local
/// storage. Every call goes to disk, so writes from other processes (a login
/// step storing a token, say) are seen on the next read.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data-local-dir>/signup-stack/local_storage.json`
    pub fn default_path() -> StorageResult<PathBuf> {
        let dir = dirs::data_local_dir().ok_or(StorageError::NoDataDir)?;
        Ok(dir.join("signup-stack").join("local_storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) -> StorageResult<()> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.into());
        self.save(&items)
    }

    /// Removes `key`, returning its previous value.
    pub fn remove_item(&self, key: &str) -> StorageResult<Option<String>> {
        let mut items = self.load()?;
        let previous = items.remove(key);
        if previous.is_some() {
            self.save(&items)?;
        }
        Ok(previous)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.save(&BTreeMap::new())
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, items: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), keys = items.len(), "Local storage written");
        Ok(())
    }
}
