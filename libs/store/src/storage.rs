//! Host card-storage interface and implementations.
//!
//! The host gives every card a small shared key/value store; all trackers
//! for a card live in one JSON value under a fixed key. This module
//! abstracts that store:
//! - An in-memory implementation backs tests.
//! - A file-backed implementation persists one JSON object per card.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Fixed key the tracker map is stored under.
pub const STORAGE_KEY: &str = "wj_trackers_v1";

/// Errors from the card storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Card-scoped shared key/value storage.
#[async_trait]
pub trait CardStorage: Send + Sync {
    /// Reads the value under `key`, or `None` when the key is unset.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Overwrites the value under `key`. Writes are whole-value only; the
    /// last writer wins.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// In-memory storage for tests and development.
pub struct MemoryStorage {
    values: Mutex<BTreeMap<String, Value>>,

    /// Whether reads and writes should fail.
    fail: bool,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self {
            values: Mutex::new(BTreeMap::new()),
            fail: false,
        }
    }

    /// Creates storage pre-populated with one key.
    pub fn seeded(key: &str, value: Value) -> Self {
        let storage = Self::new();
        if let Ok(mut values) = storage.values.lock() {
            values.insert(key.to_string(), value);
        }
        storage
    }

    /// Creates storage where every operation fails.
    pub fn failing() -> Self {
        Self {
            values: Mutex::new(BTreeMap::new()),
            fail: true,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Value>>, StorageError> {
        self.values
            .lock()
            .map_err(|_| StorageError::Unavailable("storage mutex poisoned".to_string()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable("mock storage failure".to_string()));
        }
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable("mock storage failure".to_string()));
        }
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }
}

/// File-backed storage: one JSON object per card, keys at the top level.
///
/// Writes go through a temp file and an atomic rename, so a crashed write
/// never leaves a truncated store behind.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<serde_json::Map<String, Value>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(serde_json::Map::new()),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl CardStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.read_map().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        // Other keys in the file survive a set; an unreadable file does not.
        let mut map = match self.read_map().await {
            Ok(map) => map,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "unreadable storage file; rewriting"
                );
                serde_json::Map::new()
            }
        };
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&map)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
