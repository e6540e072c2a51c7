use std::collections::{hash_map, HashMap};
use std::sync::{Mutex, MutexGuard};

use keyring::Entry;
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// Stores each key as its own OS keychain entry under a shared service name.
///
/// Entries are created once per key and reused, so backends that keep state
/// on the `Entry` itself still see their own writes.
pub struct KeychainStore {
    service: String,
    entries: Mutex<HashMap<String, Entry>>,
}

impl KeychainStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_entry<T>(
        &self,
        key: &str,
        f: impl FnOnce(&Entry) -> keyring::Result<T>,
    ) -> Result<keyring::Result<T>, StorageError> {
        let mut entries = self.entries();
        let entry = match entries.entry(key.to_string()) {
            hash_map::Entry::Occupied(slot) => slot.into_mut(),
            hash_map::Entry::Vacant(slot) => slot.insert(Entry::new(&self.service, key)?),
        };
        Ok(f(entry))
    }
}

impl KeyValueStore for KeychainStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.with_entry(key, |entry| entry.get_password())? {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_entry(key, |entry| entry.set_password(value))??;
        debug!(service = %self.service, key, "Keychain entry stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.with_entry(key, |entry| entry.delete_credential())? {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
