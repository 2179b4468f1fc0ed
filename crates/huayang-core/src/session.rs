//! Session store
//!
//! Holds the "editor is authenticated" flag in a transient slot. The flag
//! carries no identity; the display name comes from the authenticator.

use crate::error::StoreError;
use crate::slot::Slot;
use std::sync::Arc;

/// Transient slot key for the editor flag
pub const SESSION_KEY: &str = "admin_logged_in";

const FLAG_SET: &str = "true";

/// Editor flag backed by a transient slot
#[derive(Debug)]
pub struct SessionStore {
    slot: Arc<dyn Slot>,
    is_editor: bool,
}

impl SessionStore {
    /// Load the flag; anything but the literal `"true"` reads as unset
    pub async fn open(slot: Arc<dyn Slot>) -> Result<Self, StoreError> {
        let is_editor = slot.read(SESSION_KEY).await?.as_deref() == Some(FLAG_SET);
        Ok(Self { slot, is_editor })
    }

    /// Whether the session belongs to an authenticated editor
    #[inline]
    #[must_use]
    pub fn is_editor(&self) -> bool {
        self.is_editor
    }

    /// Set the flag and write it through
    pub async fn login(&mut self) -> Result<(), StoreError> {
        self.slot.write(SESSION_KEY, FLAG_SET).await?;
        self.is_editor = true;
        Ok(())
    }

    /// Clear the flag and remove the slot entry
    pub async fn logout(&mut self) -> Result<(), StoreError> {
        self.slot.remove(SESSION_KEY).await?;
        self.is_editor = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::MemorySlot;

    #[tokio::test]
    async fn login_logout_cycle() {
        let slot = Arc::new(MemorySlot::new());
        let mut session = SessionStore::open(slot.clone()).await.unwrap();
        assert!(!session.is_editor());

        session.login().await.unwrap();
        assert!(session.is_editor());
        assert_eq!(slot.read(SESSION_KEY).await.unwrap().as_deref(), Some("true"));

        session.logout().await.unwrap();
        assert!(!session.is_editor());
        assert!(slot.is_empty());
    }

    #[tokio::test]
    async fn reopen_restores_flag() {
        let slot = Arc::new(MemorySlot::new());
        slot.write(SESSION_KEY, "true").await.unwrap();
        assert!(SessionStore::open(slot.clone()).await.unwrap().is_editor());

        slot.write(SESSION_KEY, "yes").await.unwrap();
        assert!(!SessionStore::open(slot).await.unwrap().is_editor());
    }
}
