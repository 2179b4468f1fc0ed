//! Persistent volume store
//!
//! Owns the in-memory volume collection and writes it through to a durable
//! slot on every mutation. Last writer wins; there is no schema versioning.
//!
//! # Lifecycle
//!
//! ```text
//! open(slot) ──▶ list/get/update (flush after each update) ──▶ close
//! ```

use crate::error::StoreError;
use crate::seed::seed_volumes;
use crate::slot::Slot;
use crate::types::{Volume, VolumeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Durable slot key holding the serialized collection
pub const VOLUMES_KEY: &str = "huayang_volumes";

/// Slot key where unreadable content is preserved before reseeding
pub const CORRUPT_BACKUP_KEY: &str = "huayang_volumes.corrupt";

/// What to do when the durable slot holds unreadable content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryPolicy {
    /// Back up the raw content, then load and flush the seed set
    #[default]
    SeedOnCorrupt,
    /// Refuse to open
    Strict,
}

/// Write-through volume collection
#[derive(Debug)]
pub struct VolumeStore {
    slot: Arc<dyn Slot>,
    volumes: RwLock<Vec<Volume>>,
    closed: AtomicBool,
}

impl VolumeStore {
    /// Open the store, seeding the slot when it is empty
    ///
    /// # Errors
    /// - `StoreError::Io` if the slot cannot be read or the seed flushed
    /// - `StoreError::Corrupt` under [`RecoveryPolicy::Strict`]
    pub async fn open(slot: Arc<dyn Slot>, policy: RecoveryPolicy) -> Result<Self, StoreError> {
        let (volumes, needs_flush) = match slot.read(VOLUMES_KEY).await? {
            None => {
                tracing::info!("volume slot empty, seeding");
                (seed_volumes(), true)
            }
            Some(raw) => match decode(&raw) {
                Ok(volumes) => (volumes, false),
                Err(err) => match policy {
                    RecoveryPolicy::Strict => return Err(err),
                    RecoveryPolicy::SeedOnCorrupt => {
                        tracing::warn!(error = %err, backup = CORRUPT_BACKUP_KEY, "volume slot unreadable, reseeding");
                        slot.write(CORRUPT_BACKUP_KEY, &raw).await?;
                        (seed_volumes(), true)
                    }
                },
            },
        };

        let store = Self {
            slot,
            volumes: RwLock::new(volumes),
            closed: AtomicBool::new(false),
        };
        if needs_flush {
            store.flush().await?;
        }
        tracing::info!(volumes = store.len().await, "volume store opened");
        Ok(store)
    }

    /// Snapshot of the collection in display order
    pub async fn list(&self) -> Vec<Volume> {
        self.volumes.read().await.clone()
    }

    /// Look up one volume
    pub async fn get(&self, id: &VolumeId) -> Option<Volume> {
        self.volumes.read().await.iter().find(|v| &v.id == id).cloned()
    }

    /// Number of volumes
    pub async fn len(&self) -> usize {
        self.volumes.read().await.len()
    }

    /// Whether the collection is empty
    pub async fn is_empty(&self) -> bool {
        self.volumes.read().await.is_empty()
    }

    /// Replace the stored record with the same id, then flush
    ///
    /// Volumes are never created through this path.
    ///
    /// # Errors
    /// - `StoreError::Closed` after `close`
    /// - `StoreError::VolumeNotFound` if no record carries the id
    /// - `StoreError::Io` if the flush fails (the in-memory change is kept)
    pub async fn update(&self, volume: Volume) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut guard = self.volumes.write().await;
        let slot = guard
            .iter_mut()
            .find(|v| v.id == volume.id)
            .ok_or_else(|| StoreError::VolumeNotFound(volume.id.clone()))?;
        tracing::info!(volume = %volume.id, "volume updated");
        *slot = volume;

        // Flush under the write lock so the slot sees mutations in order
        write_all(self.slot.as_ref(), &guard).await
    }

    /// Replace the whole collection with the seed set
    pub async fn reset_to_seed(&self) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut guard = self.volumes.write().await;
        *guard = seed_volumes();
        tracing::warn!("volume store reset to seed");
        write_all(self.slot.as_ref(), &guard).await
    }

    /// Serialize the full collection to the slot
    pub async fn flush(&self) -> Result<(), StoreError> {
        self.ensure_open()?;
        let guard = self.volumes.read().await;
        write_all(self.slot.as_ref(), &guard).await
    }

    /// Flush and refuse further mutation
    pub async fn close(&self) -> Result<(), StoreError> {
        self.flush().await?;
        self.closed.store(true, Ordering::SeqCst);
        tracing::info!("volume store closed");
        Ok(())
    }

    /// Whether `close` has completed
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

async fn write_all(slot: &dyn Slot, volumes: &[Volume]) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(volumes)?;
    if let Err(e) = slot.write(VOLUMES_KEY, &encoded).await {
        tracing::error!(error = %e, "volume flush failed");
        return Err(e);
    }
    tracing::debug!(volumes = volumes.len(), "volumes flushed");
    Ok(())
}

fn decode(raw: &str) -> Result<Vec<Volume>, StoreError> {
    let volumes: Vec<Volume> =
        serde_json::from_str(raw).map_err(|e| StoreError::corrupt(VOLUMES_KEY, e.to_string()))?;

    let mut seen = HashSet::with_capacity(volumes.len());
    for volume in &volumes {
        if !seen.insert(&volume.id) {
            return Err(StoreError::corrupt(
                VOLUMES_KEY,
                format!("duplicate volume id {}", volume.id),
            ));
        }
    }
    Ok(volumes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SEED_VOLUME_COUNT;
    use crate::slot::MemorySlot;
    use crate::types::Rendition;

    fn memory() -> Arc<MemorySlot> {
        Arc::new(MemorySlot::new())
    }

    #[tokio::test]
    async fn open_empty_slot_seeds_and_flushes() {
        let slot = memory();
        let store = VolumeStore::open(slot.clone(), RecoveryPolicy::default())
            .await
            .unwrap();

        assert_eq!(store.len().await, SEED_VOLUME_COUNT);
        let raw = slot.read(VOLUMES_KEY).await.unwrap().unwrap();
        let persisted: Vec<Volume> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.len(), SEED_VOLUME_COUNT);
    }

    #[tokio::test]
    async fn open_reads_existing_collection() {
        let slot = memory();
        let existing = vec![Volume::new("vol-1", "卷一").with_field(Rendition::Original, "<p>甲</p>")];
        slot.write(VOLUMES_KEY, &serde_json::to_string(&existing).unwrap())
            .await
            .unwrap();

        let store = VolumeStore::open(slot, RecoveryPolicy::Strict).await.unwrap();
        assert_eq!(store.list().await, existing);
    }

    #[tokio::test]
    async fn corrupt_slot_reseeds_and_keeps_backup() {
        let slot = memory();
        slot.write(VOLUMES_KEY, "{not json").await.unwrap();

        let store = VolumeStore::open(slot.clone(), RecoveryPolicy::SeedOnCorrupt)
            .await
            .unwrap();
        assert_eq!(store.len().await, SEED_VOLUME_COUNT);
        assert_eq!(
            slot.read(CORRUPT_BACKUP_KEY).await.unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[tokio::test]
    async fn corrupt_slot_strict_fails() {
        let slot = memory();
        slot.write(VOLUMES_KEY, "42").await.unwrap();

        let err = VolumeStore::open(slot, RecoveryPolicy::Strict).await.unwrap_err();
        assert!(err.is_corrupt());
    }

    #[tokio::test]
    async fn duplicate_ids_are_corrupt() {
        let slot = memory();
        let dup = vec![Volume::new("vol-1", "a"), Volume::new("vol-1", "b")];
        slot.write(VOLUMES_KEY, &serde_json::to_string(&dup).unwrap())
            .await
            .unwrap();

        let err = VolumeStore::open(slot, RecoveryPolicy::Strict).await.unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[tokio::test]
    async fn update_writes_through() {
        let slot = memory();
        let store = VolumeStore::open(slot.clone(), RecoveryPolicy::default())
            .await
            .unwrap();

        let id = VolumeId::seed(3);
        let edited = store
            .get(&id)
            .await
            .unwrap()
            .with_field(Rendition::Translation, "<p>译</p>");
        store.update(edited.clone()).await.unwrap();

        assert_eq!(store.get(&id).await.unwrap(), edited);
        let reopened = VolumeStore::open(slot, RecoveryPolicy::Strict).await.unwrap();
        assert_eq!(reopened.get(&id).await.unwrap().translation, "<p>译</p>");
    }

    #[tokio::test]
    async fn update_unknown_volume_fails() {
        let store = VolumeStore::open(memory(), RecoveryPolicy::default())
            .await
            .unwrap();
        let err = store.update(Volume::new("vol-99", "?")).await.unwrap_err();
        assert!(matches!(err, StoreError::VolumeNotFound(_)));
        assert_eq!(store.len().await, SEED_VOLUME_COUNT);
    }

    #[tokio::test]
    async fn closed_store_rejects_updates() {
        let store = VolumeStore::open(memory(), RecoveryPolicy::default())
            .await
            .unwrap();
        store.close().await.unwrap();
        assert!(store.is_closed());

        let vol = store.get(&VolumeId::seed(1)).await.unwrap();
        assert!(matches!(store.update(vol).await, Err(StoreError::Closed)));
    }

    #[tokio::test]
    async fn reset_restores_seed() {
        let slot = memory();
        let store = VolumeStore::open(slot, RecoveryPolicy::default()).await.unwrap();
        let id = VolumeId::seed(1);
        let blanked = store.get(&id).await.unwrap().with_field(Rendition::Original, "");
        store.update(blanked).await.unwrap();

        store.reset_to_seed().await.unwrap();
        assert!(!store.get(&id).await.unwrap().is_blank(Rendition::Original));
    }
}
