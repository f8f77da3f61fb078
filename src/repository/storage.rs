use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use dashmap::DashMap;
use log::warn;
use crate::error::StorageError;

/// String keyed persistence, shaped like the browser's `localStorage`.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Process local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).map(|value| value.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// All items in one JSON object on disk. The file is re-read on every access,
/// so concurrent writers resolve as last-write-wins.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    // A corrupt file is replaced on the next write instead of blocking it.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load() {
            Err(StorageError::Serde(err)) => {
                warn!("Discarding unreadable storage file {}: {err}", self.path.display());
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(items)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.load_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match self.load() {
            Ok(mut items) => {
                if items.remove(key).is_some() {
                    self.persist(&items)?;
                }
                Ok(())
            }
            Err(StorageError::Serde(_)) => self.persist(&self.load_for_write()?),
            Err(err) => Err(err),
        }
    }
}

/// Memory storage whose writes to one key can be made to fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStorage {
    inner: MemoryStorage,
    failing_key: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl FailingStorage {
    pub(crate) fn fail_writes_to(&self, key: &str) {
        *self.failing_key.lock().unwrap() = Some(key.to_string());
    }
}

#[cfg(test)]
impl StorageBackend for FailingStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing_key.lock().unwrap().as_deref() == Some(key) {
            return Err(StorageError::Unavailable(format!("write to {key} refused")));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item("authToken").unwrap().is_none());
        storage.set_item("authToken", "a.b.c").unwrap();
        storage.set_item("authToken", "d.e.f").unwrap();
        assert_eq!(storage.get_item("authToken").unwrap().as_deref(), Some("d.e.f"));
        storage.remove_item("authToken").unwrap();
        storage.remove_item("authToken").unwrap();
        assert!(storage.get_item("authToken").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let storage = FileStorage::new(&path);
        assert!(storage.get_item("userInfo").unwrap().is_none());
        storage.set_item("userInfo", "{\"username\":\"ana\"}").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("userInfo").unwrap().as_deref(), Some("{\"username\":\"ana\"}"));
        reopened.remove_item("userInfo").unwrap();
        assert!(storage.get_item("userInfo").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(&path);
        assert!(storage.get_item("authToken").is_err());
        storage.remove_item("authToken").unwrap();
        assert!(storage.get_item("authToken").unwrap().is_none());
    }
}
