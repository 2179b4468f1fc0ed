//! Shared application state

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::session::SessionRegistry;
use huayang_assist::{bridge_from_config, AssistBridge};
use huayang_core::{Authenticator, FileSlot, SAVE_INDICATOR, VolumeStore};
use std::sync::Arc;
use std::time::Duration;

/// Everything a request handler needs, cheap to clone
#[derive(Debug, Clone)]
pub struct AppState {
    /// Volume collection
    pub store: Arc<VolumeStore>,
    /// Browser sessions
    pub sessions: Arc<SessionRegistry>,
    /// Credential checker
    pub auth: Arc<dyn Authenticator>,
    /// AI drafting
    pub assist: AssistBridge,
    /// Saving-indicator duration for new dashboards
    pub save_indicator: Duration,
}

impl AppState {
    /// Assemble state from its parts
    #[must_use]
    pub fn new(store: Arc<VolumeStore>, auth: Arc<dyn Authenticator>, assist: AssistBridge) -> Self {
        Self {
            store,
            sessions: Arc::new(SessionRegistry::new()),
            auth,
            assist,
            save_indicator: SAVE_INDICATOR,
        }
    }

    /// With a different saving-indicator duration
    #[must_use]
    pub fn with_save_indicator(mut self, delay: Duration) -> Self {
        self.save_indicator = delay;
        self
    }

    /// Open the durable store and wire collaborators from configuration
    ///
    /// # Errors
    /// - `ServerError::Store` if the volume slot cannot be opened
    /// - `ServerError::Assist` if the HTTP client cannot be built
    pub async fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let slot = Arc::new(FileSlot::new(config.data_dir.clone()));
        let store = VolumeStore::open(slot, config.recovery).await?;

        let credentials = config.credentials();
        if !credentials.is_enabled() {
            tracing::warn!("no admin password configured, every login will be rejected");
        }
        let assist = bridge_from_config(&config.gemini)?;

        Ok(Self::new(Arc::new(store), Arc::new(credentials), assist)
            .with_save_indicator(config.save_indicator()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huayang_core::SEED_VOLUME_COUNT;

    #[tokio::test]
    async fn from_config_seeds_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::new().with_data_dir(dir.path());

        let state = AppState::from_config(&config).await.unwrap();
        assert_eq!(state.store.len().await, SEED_VOLUME_COUNT);
        assert!(state.sessions.is_empty());
        assert!(!state.auth.verify("llh", ""));
    }
}
