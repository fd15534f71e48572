//! In-process token storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::TokenStorage;
use crate::error::StorageError;

/// Token storage kept in memory; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryTokenStorage {
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let storage = MemoryTokenStorage::default();
        let other = storage.clone();
        storage.write("key", "value").unwrap();
        assert_eq!(other.read("key").unwrap().as_deref(), Some("value"));

        other.remove("key").unwrap();
        other.remove("key").unwrap();
        assert!(storage.is_empty());
    }
}
