//! Views over the volume collection
//!
//! - [`home`]: the table of volumes
//! - [`reader`]: one volume, one rendition, read-only
//! - [`admin`]: the editing dashboard

pub mod admin;
pub mod home;
pub mod reader;

pub use admin::{AdminDashboard, AssistOutcome, AssistRequest, AssistTarget, SAVE_INDICATOR};
pub use home::{home_entries, HomeEntry};
pub use reader::{ReaderContent, ReaderOutcome, ReaderView};
