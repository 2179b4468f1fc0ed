//! Browser sessions
//!
//! Each browser gets a `huayang_session` cookie naming an [`EditorSession`]:
//! its own transient slot with the editor flag, plus the dashboard state
//! that a single-page client would keep in memory. Sessions are only created
//! on a successful login and removed on logout, so anonymous readers hold no
//! server state.

use dashmap::DashMap;
use huayang_core::{AdminDashboard, DashboardError, MemorySlot, SessionStore, StoreError, Volume};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "huayang_session";

/// Per-browser editing state
#[derive(Debug)]
pub struct EditorSession {
    /// Editor flag over the session's own transient slot
    pub session: SessionStore,
    /// Dashboard, created on first visit to the admin page
    pub dashboard: Option<AdminDashboard>,
    /// One-shot message for the next admin page render
    pub notice: Option<String>,
}

impl EditorSession {
    /// Fresh session with an unset flag
    pub async fn open() -> Result<Self, StoreError> {
        Ok(Self {
            session: SessionStore::open(Arc::new(MemorySlot::new())).await?,
            dashboard: None,
            notice: None,
        })
    }

    /// The dashboard, creating it over `volumes` if needed
    pub fn dashboard(
        &mut self,
        volumes: &[Volume],
        save_indicator: Duration,
    ) -> Result<&mut AdminDashboard, DashboardError> {
        if self.dashboard.is_none() {
            let dashboard = AdminDashboard::new(volumes)?.with_save_indicator(save_indicator);
            self.dashboard = Some(dashboard);
        }
        self.dashboard.as_mut().ok_or(DashboardError::NoVolumes)
    }
}

/// Shared handle to one session
pub type SharedSession = Arc<Mutex<EditorSession>>;

/// Live sessions keyed by cookie value
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SharedSession>,
}

impl SessionRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session by cookie value
    #[must_use]
    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Look up the session named by an optional cookie
    #[must_use]
    pub fn find(&self, cookie: Option<&str>) -> Option<(String, SharedSession)> {
        let id = cookie?;
        self.get(id).map(|session| (id.to_string(), session))
    }

    /// Register a session under a new random id
    pub fn insert(&self, session: SharedSession) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), session);
        tracing::debug!(sessions = self.sessions.len(), "session registered");
        id
    }

    /// Drop a session
    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Number of live sessions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are live
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Whether the cookie names a logged-in session
    pub async fn is_editor(&self, cookie: Option<&str>) -> bool {
        match self.find(cookie) {
            Some((_, session)) => session.lock().await.session.is_editor(),
            None => false,
        }
    }
}

/// `Set-Cookie` value for a session id
#[must_use]
pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that makes the browser drop the session cookie
#[must_use]
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use huayang_core::seed_volumes;

    #[tokio::test]
    async fn registry_roundtrip() {
        let registry = SessionRegistry::new();
        assert!(!registry.is_editor(None).await);
        assert!(!registry.is_editor(Some("missing")).await);

        let shared = Arc::new(Mutex::new(EditorSession::open().await.unwrap()));
        let id = registry.insert(shared.clone());
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_editor(Some(&id)).await);

        shared.lock().await.session.login().await.unwrap();
        assert!(registry.is_editor(Some(&id)).await);

        assert!(registry.remove(&id));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn dashboard_created_once() {
        let volumes = seed_volumes();
        let mut session = EditorSession::open().await.unwrap();

        session
            .dashboard(&volumes, Duration::ZERO)
            .unwrap()
            .edit("<p>draft</p>");
        let dashboard = session.dashboard(&volumes, Duration::ZERO).unwrap();
        assert_eq!(dashboard.buffer(), "<p>draft</p>");
    }

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("abc");
        assert!(cookie.starts_with("huayang_session=abc;"));
        assert!(cookie.contains("HttpOnly"));

        let expired = expired_session_cookie();
        assert!(expired.starts_with("huayang_session=;"));
        assert!(expired.ends_with("Max-Age=0"));
    }
}
