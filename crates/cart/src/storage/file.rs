use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use super::{KeyValueStorage, StorageError};

/// JSON file-backed storage.
///
/// The whole file is a single JSON object mapping keys to string values. It
/// is loaded once on open and rewritten in full on every `set_item`, through
/// a temporary file renamed over the original so a crash never leaves a
/// half-written file behind.
#[derive(Debug)]
pub struct FileStorage {
    entries: RwLock<BTreeMap<String, String>>,
    path: PathBuf,
}

impl FileStorage {
    /// Open the storage file at `path`, creating parent directories as needed.
    ///
    /// A missing file is treated as empty storage and created on first write.
    /// A file that is not a JSON string map is logged and treated as empty;
    /// it is replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be read, or
    /// its parent directory cannot be created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let read = fs::read(&path).await;
        let entries: BTreeMap<String, String> = match read {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Storage file is corrupt, starting empty"
                );
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened storage file");

        Ok(Self {
            entries: RwLock::new(entries),
            path,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, data)
            .await
            .map_err(|source| StorageError::Io {
                path: tmp.clone(),
                source,
            })?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StorageError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        // Held across the write so concurrent setters hit the disk in order.
        let mut entries = self.entries.write().await;
        entries.insert(key.to_owned(), value);
        self.write_file(&entries).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("gm_storage_{}", uuid::Uuid::new_v4()))
            .join("storage.json")
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let path = temp_path();
        let storage = FileStorage::open(&path).await.unwrap();
        assert_eq!(storage.get_item("a").await.unwrap(), None);

        storage.set_item("a", "1".to_string()).await.unwrap();
        storage.set_item("b", "2".to_string()).await.unwrap();
        storage.set_item("a", "3".to_string()).await.unwrap();

        let reopened = FileStorage::open(&path).await.unwrap();
        assert_eq!(reopened.get_item("a").await.unwrap().as_deref(), Some("3"));
        assert_eq!(reopened.get_item("b").await.unwrap().as_deref(), Some("2"));
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_corrupt_file_opens_empty() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, b"[not a map").await.unwrap();

        let storage = FileStorage::open(&path).await.unwrap();
        assert_eq!(storage.get_item("a").await.unwrap(), None);

        storage.set_item("a", "1".to_string()).await.unwrap();
        let raw = fs::read_to_string(&path).await.unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(map.get("a").map(String::as_str), Some("1"));

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_empty_file_opens_empty() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, b"").await.unwrap();

        let storage = FileStorage::open(&path).await.unwrap();
        assert_eq!(storage.get_item("a").await.unwrap(), None);
        assert_eq!(storage.path(), path.as_path());

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
    }
}
