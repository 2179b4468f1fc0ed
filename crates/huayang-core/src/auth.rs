//! Editor authentication
//!
//! Authentication is a pluggable collaborator behind [`Authenticator`].
//! [`StaticCredentials`] checks one configured username/password pair and is
//! a placeholder, not an authorization model.

use crate::error::LoginError;
use crate::route::Route;
use crate::session::SessionStore;

/// Display name used when none is configured
pub const DEFAULT_DISPLAY_NAME: &str = "llh";

/// Credential checker
pub trait Authenticator: Send + Sync + std::fmt::Debug {
    /// Whether the pair is accepted
    fn verify(&self, username: &str, password: &str) -> bool;

    /// Name shown in the header while logged in
    fn display_name(&self) -> &str;
}

/// Single configured username/password pair
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: Option<String>,
    display_name: String,
}

impl StaticCredentials {
    /// Accept exactly `username` / `password`
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            display_name: username.clone(),
            username,
            password: Some(password.into()),
        }
    }

    /// Reject every attempt (no password configured)
    #[must_use]
    pub fn disabled(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            display_name: username.clone(),
            username,
            password: None,
        }
    }

    /// With a display name different from the username
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Whether any login can succeed
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.password.is_some()
    }
}

impl Authenticator for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        match &self.password {
            Some(expected) => username == self.username && password == expected,
            None => false,
        }
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Check credentials and set the session flag
///
/// Returns the route to navigate to. On mismatch the session is untouched.
pub async fn login(
    auth: &dyn Authenticator,
    session: &mut SessionStore,
    username: &str,
    password: &str,
) -> Result<Route, LoginError> {
    if !auth.verify(username, password) {
        tracing::warn!(username, "login rejected");
        return Err(LoginError::InvalidCredentials);
    }
    session.login().await?;
    tracing::info!(username, "editor logged in");
    Ok(Route::Admin)
}

/// Clear the session flag and go home
pub async fn logout(session: &mut SessionStore) -> Result<Route, LoginError> {
    session.logout().await?;
    tracing::info!("editor logged out");
    Ok(Route::Home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::MemorySlot;
    use std::sync::Arc;

    async fn fresh_session() -> SessionStore {
        SessionStore::open(Arc::new(MemorySlot::new())).await.unwrap()
    }

    #[test]
    fn static_credentials_verify() {
        let auth = StaticCredentials::new("llh", "secret");
        assert!(auth.verify("llh", "secret"));
        assert!(!auth.verify("llh", "wrong"));
        assert!(!auth.verify("other", "secret"));
        assert!(!auth.verify("other", "wrong"));
        assert_eq!(auth.display_name(), "llh");
    }

    #[test]
    fn disabled_credentials_reject_everything() {
        let auth = StaticCredentials::disabled("llh");
        assert!(!auth.is_enabled());
        assert!(!auth.verify("llh", ""));
    }

    #[tokio::test]
    async fn login_success_sets_flag() {
        let auth = StaticCredentials::new("llh", "secret");
        let mut session = fresh_session().await;

        let route = login(&auth, &mut session, "llh", "secret").await.unwrap();
        assert_eq!(route, Route::Admin);
        assert!(session.is_editor());

        assert_eq!(logout(&mut session).await.unwrap(), Route::Home);
        assert!(!session.is_editor());
    }

    #[tokio::test]
    async fn login_mismatch_leaves_flag_unset() {
        let auth = StaticCredentials::new("llh", "secret");
        let mut session = fresh_session().await;

        for (user, pass) in [("llh", "nope"), ("root", "secret"), ("root", "nope")] {
            let err = login(&auth, &mut session, user, pass).await.unwrap_err();
            assert!(matches!(err, LoginError::InvalidCredentials));
            assert!(!session.is_editor());
        }
    }
}
