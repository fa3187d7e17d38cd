//! Persistent key/value storage for the session mirror.
//!
//! The session manager only needs three synchronous operations on string
//! keys, captured by the `KeyValueStore` trait. Backends:
//! - `MemoryStore`: in-process map, nothing survives a restart
//! - `FileStore`: a single JSON file in the cache directory
//! - `KeyringStore`: one OS keychain entry per key

pub mod file;
pub mod keychain;
pub mod memory;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{Config, StoreBackend};

pub use self::file::FileStore;
pub use self::keychain::KeyringStore;
pub use self::memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),
}

/// Durable string-to-string storage with no transactions and no expiry.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key has never been set or was removed
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Open the store selected in the configuration
pub fn open(config: &Config, storage_dir: &Path) -> Arc<dyn KeyValueStore> {
    match config.store {
        StoreBackend::File => Arc::new(FileStore::new(storage_dir)),
        StoreBackend::Keyring => Arc::new(KeyringStore::new(config.keyring_service())),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    }
}
