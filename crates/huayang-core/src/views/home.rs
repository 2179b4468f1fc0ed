//! Home view: the table of contents

use crate::route::Route;
use crate::types::{Volume, VolumeId};

/// One entry in the volume grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeEntry {
    /// Volume id
    pub id: VolumeId,
    /// Display title
    pub title: String,
    /// Reader link
    pub href: String,
}

/// Entries in collection order
#[must_use]
pub fn home_entries(volumes: &[Volume]) -> Vec<HomeEntry> {
    volumes
        .iter()
        .map(|v| HomeEntry {
            id: v.id.clone(),
            title: v.title.clone(),
            href: Route::Reader(v.id.clone()).path(),
        })
        .collect()
}
