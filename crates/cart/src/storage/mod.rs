//! Durable key-value storage used to persist the cart.
//!
//! The cart only ever touches one key, but the storage itself is a general
//! string-to-string map so several app features can share one backend, the
//! way the mobile app's async storage is shared.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - process-local map, for tests and ephemeral sessions
//! - [`FileStorage`] - JSON object file on disk

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory map could not be encoded for writing.
    #[error("failed to encode storage contents: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Async string key-value storage.
///
/// Implementations must be safe to share between tasks. `set_item` replaces
/// any previous value; there is no versioning and the last writer wins.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
}
