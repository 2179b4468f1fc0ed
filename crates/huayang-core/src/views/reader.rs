//! Reader view
//!
//! Shows one rendition of one volume. Stored HTML is rendered verbatim; it
//! is trusted because only authenticated editors write it.

use crate::route::Route;
use crate::types::{Rendition, Volume, VolumeId};

/// What the reader should display for the active tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderContent<'a> {
    /// Nothing stored yet; show the placeholder message
    Empty {
        /// e.g. `暂无译文内容`
        placeholder: String,
    },
    /// Stored HTML, unmodified
    Html(&'a str),
}

/// Result of opening the reader for a route id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderOutcome {
    /// Volume found
    Show(ReaderView),
    /// Unknown id; navigate here instead
    Redirect(Route),
}

/// Read-only view of one volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderView {
    volume: Volume,
    tab: Rendition,
}

impl ReaderView {
    /// Find the volume for `id`, or redirect home
    #[must_use]
    pub fn open(volumes: &[Volume], id: &VolumeId) -> ReaderOutcome {
        match volumes.iter().find(|v| &v.id == id) {
            Some(volume) => ReaderOutcome::Show(Self {
                volume: volume.clone(),
                tab: Rendition::default(),
            }),
            None => {
                tracing::debug!(volume = %id, "reader: unknown volume, redirecting home");
                ReaderOutcome::Redirect(Route::Home)
            }
        }
    }

    /// Switch tab
    pub fn select(&mut self, tab: Rendition) {
        self.tab = tab;
    }

    /// With a tab selected
    #[must_use]
    pub fn with_tab(mut self, tab: Rendition) -> Self {
        self.select(tab);
        self
    }

    /// Active tab
    #[inline]
    #[must_use]
    pub fn tab(&self) -> Rendition {
        self.tab
    }

    /// The volume being read
    #[inline]
    #[must_use]
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Tabs with their active flag
    #[must_use]
    pub fn tabs(&self) -> [(Rendition, bool); 3] {
        Rendition::ALL.map(|r| (r, r == self.tab))
    }

    /// Content for the active tab
    #[must_use]
    pub fn content(&self) -> ReaderContent<'_> {
        if self.volume.is_blank(self.tab) {
            ReaderContent::Empty {
                placeholder: self.tab.empty_placeholder(),
            }
        } else {
            ReaderContent::Html(self.volume.field(self.tab))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_volumes;

    fn open(id: &str) -> ReaderView {
        match ReaderView::open(&seed_volumes(), &VolumeId::new(id)) {
            ReaderOutcome::Show(view) => view,
            ReaderOutcome::Redirect(to) => panic!("unexpected redirect to {to}"),
        }
    }

    #[test]
    fn unknown_volume_redirects_home() {
        assert_eq!(
            ReaderView::open(&seed_volumes(), &VolumeId::new("vol-404")),
            ReaderOutcome::Redirect(Route::Home)
        );
    }

    #[test]
    fn defaults_to_original() {
        let view = open("vol-1");
        assert_eq!(view.tab(), Rendition::Original);
        assert!(matches!(view.content(), ReaderContent::Html(html) if html.contains("华阳县")));
        assert_eq!(view.tabs()[0], (Rendition::Original, true));
    }

    #[test]
    fn empty_translation_shows_placeholder() {
        let view = open("vol-2").with_tab(Rendition::Translation);
        assert_eq!(
            view.content(),
            ReaderContent::Empty {
                placeholder: "暂无译文内容".to_string()
            }
        );
    }

    #[test]
    fn blank_paragraph_counts_as_empty() {
        let volumes = vec![Volume::new("v", "t").with_field(Rendition::Annotation, "<p><br></p>")];
        let ReaderOutcome::Show(mut view) = ReaderView::open(&volumes, &VolumeId::new("v")) else {
            panic!("volume should exist");
        };
        view.select(Rendition::Annotation);
        assert!(matches!(view.content(), ReaderContent::Empty { .. }));
    }
}
