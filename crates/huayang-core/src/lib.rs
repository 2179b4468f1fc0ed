//! Huayang Core - gazetteer volumes and their editing model
//!
//! The domain behind the Huayang county gazetteer site:
//! - A fixed table of volumes, each with original text, annotations and a
//!   vernacular translation
//! - A write-through volume store over a durable slot
//! - A session flag over a transient slot
//! - A rich text editor with its own formatting-command layer
//! - Reader, home and admin views, and the route table gating them
//!
//! # Example
//!
//! ```rust,ignore
//! use huayang_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = VolumeStore::open(Arc::new(FileSlot::new("data")), RecoveryPolicy::default()).await?;
//! let volumes = store.list().await;
//!
//! let mut dashboard = AdminDashboard::new(&volumes)?;
//! dashboard.select_tab(&volumes, Rendition::Translation)?;
//! dashboard.edit("<p>华阳县，是古代蜀国的领地。</p>");
//! store.update(dashboard.save(&volumes)?).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod auth;
pub mod editor;
pub mod error;
pub mod route;
pub mod seed;
pub mod session;
pub mod slot;
pub mod store;
pub mod types;
pub mod views;

// Re-exports for convenience
pub use auth::{Authenticator, StaticCredentials, DEFAULT_DISPLAY_NAME};
pub use editor::{
    EditorState, FormatCommand, RichEditor, Selection, SyncOutcome, ToolbarButton, TOOLBAR,
};
pub use error::{DashboardError, FormatError, LoginError, RouteError, StoreError};
pub use route::{Resolution, Route};
pub use seed::{seed_volumes, SEED_VOLUME_COUNT};
pub use session::{SessionStore, SESSION_KEY};
pub use slot::{FileSlot, MemorySlot, Slot};
pub use store::{RecoveryPolicy, VolumeStore, CORRUPT_BACKUP_KEY, VOLUMES_KEY};
pub use types::{is_blank_html, Rendition, Volume, VolumeId, BLANK_PARAGRAPH};
pub use views::{
    home_entries, AdminDashboard, AssistOutcome, AssistRequest, AssistTarget, HomeEntry,
    ReaderContent, ReaderOutcome, ReaderView, SAVE_INDICATOR,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Huayang Core
    pub use crate::{
        AdminDashboard, AssistTarget, FileSlot, MemorySlot, ReaderContent, ReaderOutcome,
        ReaderView, RecoveryPolicy, Rendition, Route, SessionStore, Volume, VolumeId, VolumeStore,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
