//! Navigation routes
//!
//! Four routes: home list, reader by id, login, admin. Admin is gated by
//! the session flag; an unknown reader id is resolved by the reader view.

use crate::types::VolumeId;

/// Application route
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Volume list (`/`)
    Home,
    /// Reader for one volume (`/read/:id`)
    Reader(VolumeId),
    /// Login form (`/login`)
    Login,
    /// Admin dashboard (`/admin`)
    Admin,
}

/// Outcome of resolving a route against the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Show the route
    Render(Route),
    /// Navigate elsewhere instead
    Redirect(Route),
}

impl Route {
    /// Canonical path
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Reader(id) => format!("/read/{id}"),
            Route::Login => "/login".to_string(),
            Route::Admin => "/admin".to_string(),
        }
    }

    /// Apply the session gate
    #[must_use]
    pub fn resolve(self, is_editor: bool) -> Resolution {
        match self {
            Route::Admin if !is_editor => Resolution::Redirect(Route::Login),
            other => Resolution::Render(other),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
