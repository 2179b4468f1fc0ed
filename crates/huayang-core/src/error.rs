//! Error types for Huayang Core
//!
//! Provides error handling for:
//! - Durable and transient slot access
//! - Volume store lifecycle (load, flush, close)
//! - Login and route resolution
//! - Admin dashboard operations (save, AI assist preconditions)
//! - Editor formatting commands

use crate::types::{Rendition, VolumeId};

/// Slot and store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying slot I/O failed
    #[error("slot io error on '{key}': {source}")]
    Io {
        /// Slot key being accessed
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Slot content could not be decoded
    #[error("corrupt content in slot '{key}': {reason}")]
    Corrupt {
        /// Slot key holding the content
        key: String,
        /// Decoder message
        reason: String,
    },

    /// Collection could not be encoded
    #[error("failed to encode volumes: {0}")]
    Encode(#[from] serde_json::Error),

    /// Unknown volume id
    #[error("volume not found: {0}")]
    VolumeNotFound(VolumeId),

    /// Store used after `close`
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// Create IO error for slot key
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }

    /// Create corrupt-content error for slot key
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error came from slot content rather than I/O
    #[inline]
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Login failures
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Username or password did not match
    #[error("用户名或密码错误")]
    InvalidCredentials,

    /// Session flag could not be written
    #[error("session error: {0}")]
    Session(#[from] StoreError),
}

/// Admin dashboard errors
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Collection has no volumes to select
    #[error("no volumes available")]
    NoVolumes,

    /// Selected volume id is not in the collection
    #[error("volume not found: {0}")]
    VolumeNotFound(VolumeId),

    /// AI assist requested on the original tab
    #[error("AI助手只能用于生成注释或译文")]
    AssistOnOriginal,

    /// AI assist requested while the original text is empty
    #[error("请先确保“原文”内容不为空")]
    OriginalEmpty,

    /// AI assist requested without confirming the overwrite
    #[error("AI assist not confirmed")]
    NotConfirmed,

    /// A generation request is already outstanding
    #[error("AI assist already in progress")]
    AssistInFlight,

    /// Completion arrived for a request the dashboard no longer waits on
    #[error("stale AI result for {volume}/{rendition}")]
    StaleAssist {
        /// Volume the request was issued for
        volume: VolumeId,
        /// Rendition the request was issued for
        rendition: Rendition,
    },

    /// Formatting command failed
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

impl DashboardError {
    /// Check if this is an AI-assist refusal that leaves state unchanged
    #[inline]
    #[must_use]
    pub fn is_assist_refusal(&self) -> bool {
        matches!(
            self,
            Self::AssistOnOriginal | Self::OriginalEmpty | Self::NotConfirmed | Self::AssistInFlight
        )
    }
}

/// Editor formatting command errors
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Unrecognized toolbar command name
    #[error("unknown format command: '{0}'")]
    UnknownCommand(String),

    /// Heading level outside 1..=6
    #[error("invalid heading level: {0}")]
    InvalidHeadingLevel(u8),
}

/// Query value parsing errors
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Rendition query value not recognized
    #[error("unknown rendition: '{0}'")]
    UnknownRendition(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::corrupt("huayang_volumes", "expected value");
        assert!(err.to_string().contains("huayang_volumes"));
        assert!(err.is_corrupt());

        let io = StoreError::io("k", std::io::Error::other("disk"));
        assert!(!io.is_corrupt());
    }

    #[test]
    fn login_error_message_is_user_facing() {
        assert_eq!(LoginError::InvalidCredentials.to_string(), "用户名或密码错误");
    }

    #[test]
    fn dashboard_refusals() {
        assert!(DashboardError::AssistOnOriginal.is_assist_refusal());
        assert!(DashboardError::OriginalEmpty.is_assist_refusal());
        assert!(DashboardError::AssistInFlight.is_assist_refusal());
        assert!(!DashboardError::NoVolumes.is_assist_refusal());
    }
}
