//! Per-profile token storage in the OS keychain.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use jotter_core::{StorageError, TokenStorage};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "jotter-cli";

/// Stores each token key as its own keychain entry, namespaced by profile.
#[derive(Debug, Clone)]
pub struct KeyringTokenStorage {
    profile_name: String,
}

impl KeyringTokenStorage {
    pub fn new(profile_name: &str) -> Self {
        Self {
            profile_name: profile_name.to_string(),
        }
    }

    fn username(&self, key: &str) -> String {
        format!("{}:{key}", self.profile_name)
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username(key))
            .map_err(|error| StorageError(error.to_string()))
    }
}

impl TokenStorage for KeyringTokenStorage {
    #[cfg(not(test))]
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(StorageError(error.to_string())),
        }
    }

    #[cfg(test)]
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| StorageError(error.to_string()))?;
        Ok(guard.get(&self.username(key)).cloned())
    }

    #[cfg(not(test))]
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?
            .set_password(value)
            .map_err(|error| StorageError(error.to_string()))
    }

    #[cfg(test)]
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| StorageError(error.to_string()))?;
        guard.insert(self.username(key), value.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(StorageError(error.to_string())),
        }
    }

    #[cfg(test)]
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| StorageError(error.to_string()))?;
        guard.remove(&self.username(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn profiles_do_not_share_tokens() {
        let work = KeyringTokenStorage::new("keychain-test-work");
        let home = KeyringTokenStorage::new("keychain-test-home");

        work.write("jotter.access_token", "work-token").unwrap();
        assert_eq!(
            work.read("jotter.access_token").unwrap().as_deref(),
            Some("work-token")
        );
        assert_eq!(home.read("jotter.access_token").unwrap(), None);

        work.remove("jotter.access_token").unwrap();
        work.remove("jotter.access_token").unwrap();
        assert_eq!(work.read("jotter.access_token").unwrap(), None);
    }
}
