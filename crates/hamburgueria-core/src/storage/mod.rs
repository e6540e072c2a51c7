//! Persistent key-value storage for session state.
//!
//! The session manager writes exactly two keys and treats everything else
//! in the store as belonging to someone else. Three backends are provided:
//!
//! - `FileStore`: a JSON object file in the platform data directory
//! - `KeychainStore`: one OS keychain entry per key via keyring
//! - `MemoryStore`: process-local, for tests and throwaway runs

pub mod file;
pub mod keychain;
pub mod memory;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FileStore;
pub use keychain::KeychainStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),

    #[error("Malformed persisted state under {key}: {source}")]
    MalformedPersistedState {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Could not find data directory")]
    NoDataDir,
}

/// Durable string-to-string store.
///
/// Removing an absent key is not an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Which backend to open, as named in config and `HAMBURGUERIA_STORE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    Keyring,
    Memory,
}

impl StoreKind {
    /// Open the backend, scoped to `app_name`
    pub fn open(self, app_name: &str) -> Result<Arc<dyn KeyValueStore>, StorageError> {
        let store: Arc<dyn KeyValueStore> = match self {
            StoreKind::File => Arc::new(FileStore::in_data_dir(app_name)?),
            StoreKind::Keyring => Arc::new(KeychainStore::new(app_name)),
            StoreKind::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(store)
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(StoreKind::File),
            "keyring" | "keychain" => Ok(StoreKind::Keyring),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("Unknown store kind: {}", other)),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreKind::File => "file",
            StoreKind::Keyring => "keyring",
            StoreKind::Memory => "memory",
        };
        f.write_str(name)
    }
}
