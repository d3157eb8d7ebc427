//! The persistent store contract: typed `load`/`save` over a byte store.
//!
//! Values are serialized as JSON text. A missing or unparsable value never
//! fails a load; the caller's default is returned instead. Saves always write
//! the whole value.

use std::collections::HashMap;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// Synchronous byte-level key-value storage.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Reads and decodes the value under `key`, or returns `default`.
pub fn load<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let bytes = match store.read(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return default,
        Err(e) => {
            warn!("Failed to read '{key}', using default: {e}");
            return default;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            warn!("Stored value under '{key}' does not parse, using default: {e}");
            default
        }
    }
}

/// Encodes `value` and writes it under `key`.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let bytes = serde_json::to_vec(value)?;
    store.write(key, &bytes)
}

/// Volatile store for hosts without a writable filesystem, and for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
