//! Server error types

use huayang_assist::AssistError;
use huayang_core::{DashboardError, LoginError, StoreError};
use std::path::PathBuf;
use warp::http::StatusCode;

/// Errors surfaced by the HTTP layer and the binary
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::ServerConfig`]
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Volume or session storage failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Dashboard operation failed
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    /// Login could not complete
    #[error(transparent)]
    Login(#[from] LoginError),

    /// Generation service could not be set up
    #[error(transparent)]
    Assist(#[from] AssistError),
}

impl ServerError {
    /// HTTP status for an error page
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Dashboard(DashboardError::VolumeNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Dashboard(DashboardError::Format(_)) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if the request, not the server, was at fault
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}
