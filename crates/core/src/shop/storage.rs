//! Durable per-browser storage for the shop's collections.
//!
//! Storage is a plain string key-value store. The shop owns two slots, one
//! for the cart and one for favorite IDs, each holding a JSON document.
//! Reads and writes through [`read_slot`] and [`write_slot`] are best-effort:
//! failures are logged and never reach the caller.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Slot holding the serialized cart entries.
pub const CART_STORAGE_KEY: &str = "amarine_cart";

/// Slot holding the serialized favorite product IDs.
pub const FAVORITES_STORAGE_KEY: &str = "amarine_favorites";

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The backend refused to store more data.
    #[error("storage quota exceeded writing {key}")]
    QuotaExceeded {
        /// Slot being written.
        key: String,
    },
}

/// A string key-value store scoped to one browser.
pub trait DurableStorage {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

impl<T: DurableStorage + ?Sized> DurableStorage for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory storage, used when nothing durable is available and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot with a raw value.
    #[must_use]
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }

    /// Raw value of a slot.
    #[must_use]
    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.slots.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Read and decode a slot.
///
/// Returns `None` when the slot is absent, unreadable or malformed. The last
/// two cases are logged.
pub fn read_slot<T, S>(storage: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: DurableStorage + ?Sized,
{
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read shop storage slot");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding malformed shop storage slot");
            None
        }
    }
}

/// Encode and write a slot, logging any failure.
pub fn write_slot<T, S>(storage: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: DurableStorage + ?Sized,
{
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to serialize shop storage slot");
            return;
        }
    };

    if let Err(e) = storage.set(key, raw) {
        tracing::warn!(key, error = %e, "Failed to write shop storage slot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Storage whose every operation fails.
    struct BrokenStorage;

    impl DurableStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }

        fn set(&mut self, key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
            })
        }
    }

    #[test]
    fn test_read_absent_slot() {
        let storage = MemoryStorage::new();
        assert_eq!(read_slot::<Vec<String>, _>(&storage, CART_STORAGE_KEY), None);
    }

    #[test]
    fn test_read_malformed_slot() {
        let storage = MemoryStorage::new().with_slot(FAVORITES_STORAGE_KEY, "{not json");
        assert_eq!(
            read_slot::<Vec<String>, _>(&storage, FAVORITES_STORAGE_KEY),
            None
        );
    }

    #[test]
    fn test_write_then_read() {
        let mut storage = MemoryStorage::new();
        write_slot(&mut storage, FAVORITES_STORAGE_KEY, &["1", "2"]);
        assert_eq!(storage.slot(FAVORITES_STORAGE_KEY), Some(r#"["1","2"]"#));
        assert_eq!(
            read_slot::<Vec<String>, _>(&storage, FAVORITES_STORAGE_KEY),
            Some(vec!["1".to_string(), "2".to_string()])
        );
    }

    #[test]
    fn test_broken_backend_is_swallowed() {
        let mut storage = BrokenStorage;
        assert_eq!(read_slot::<Vec<String>, _>(&storage, CART_STORAGE_KEY), None);
        write_slot(&mut storage, CART_STORAGE_KEY, &Vec::<String>::new());
    }
}
