//! Session-scoped key-value persistence.
//!
//! Every piece of mutable session state (preferences, status map, status history, digests,
//! saved jobs) is a JSON blob under its own key. Readers go through [`load_or_default`] and
//! [`load_optional`], which treat missing, unreadable, or undecodable blobs as "no data" and
//! log the failure instead of returning it.

mod file;

use std::collections::HashMap;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub use file::FileStore;

/// String-keyed blob storage injected into every stateful component.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Error enumeration for store failures. Components log these and fall back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store key '{0}'")]
    InvalidKey(String),
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Ephemeral store used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.entries.lock().expect("store mutex poisoned");
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().expect("store mutex poisoned");
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().expect("store mutex poisoned");
        guard.remove(key);
        Ok(())
    }
}

/// Decodes the blob under `key`, or `None` when it is missing or unusable.
pub(crate) fn load_optional<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(key, error = %err, "failed to read stored value; treating as absent");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "stored value is corrupt; treating as absent");
            None
        }
    }
}

pub(crate) fn load_or_default<S, T>(store: &S, key: &str) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    load_optional(store, key).unwrap_or_default()
}

/// Encodes and writes `value`. Returns whether the write landed; failures are logged only.
pub(crate) fn save<S, T>(store: &S, key: &str, value: &T) -> bool
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(err) => {
            warn!(key, error = %err, "failed to encode value for storage");
            return false;
        }
    };

    match store.set(key, &encoded) {
        Ok(()) => true,
        Err(err) => {
            warn!(key, error = %err, "failed to persist value; change kept in memory only");
            false
        }
    }
}

pub(crate) fn discard<S>(store: &S, key: &str)
where
    S: KeyValueStore + ?Sized,
{
    if let Err(err) = store.remove(key) {
        warn!(key, error = %err, "failed to remove stored value");
    }
}
