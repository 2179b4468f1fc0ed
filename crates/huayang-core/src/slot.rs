//! Key-value slots
//!
//! A slot is a named string entry. Two backings:
//! - [`FileSlot`]: durable, one file per key under a data directory
//! - [`MemorySlot`]: transient, lives as long as the owning session

use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Named string storage
#[async_trait]
pub trait Slot: Send + Sync + std::fmt::Debug {
    /// Read a key, `None` if absent
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a key, replacing any previous value
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Durable slot backed by files in a directory
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Create slot rooted at `dir` (created lazily on first write)
    #[inline]
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl Slot for FileSlot {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(key, e))?;

        // Rename over the target so readers never see a partial write
        let target = self.path_for(key);
        let staging = self.dir.join(format!("{key}.tmp"));
        tokio::fs::write(&staging, value)
            .await
            .map_err(|e| StoreError::io(key, e))?;
        tokio::fs::rename(&staging, &target)
            .await
            .map_err(|e| StoreError::io(key, e))?;

        tracing::trace!(key, bytes = value.len(), "slot written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }
}

/// Transient in-memory slot
#[derive(Debug, Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    /// Create empty slot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no keys are held
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl Slot for MemorySlot {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_slot_read_write_remove() {
        let slot = MemorySlot::new();
        assert_eq!(slot.read("k").await.unwrap(), None);

        slot.write("k", "true").await.unwrap();
        assert_eq!(slot.read("k").await.unwrap().as_deref(), Some("true"));
        assert_eq!(slot.len(), 1);

        slot.remove("k").await.unwrap();
        assert!(slot.is_empty());
        slot.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn file_slot_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("data"));

        assert_eq!(slot.read("huayang_volumes").await.unwrap(), None);
        slot.write("huayang_volumes", "[]").await.unwrap();

        let reopened = FileSlot::new(dir.path().join("data"));
        assert_eq!(
            reopened.read("huayang_volumes").await.unwrap().as_deref(),
            Some("[]")
        );
        assert!(!dir.path().join("data/huayang_volumes.tmp").exists());

        reopened.remove("huayang_volumes").await.unwrap();
        assert_eq!(slot.read("huayang_volumes").await.unwrap(), None);
    }
}
