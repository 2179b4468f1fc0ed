//! Core types for the gazetteer
//!
//! Defines:
//! - Volume identity and its three HTML renditions
//! - The closed rendition selector
//! - Blank-content detection shared by the reader and the editor

use crate::error::RouteError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Canonical blank paragraph an emptied editor surface produces
pub const BLANK_PARAGRAPH: &str = "<p><br></p>";

/// Opaque volume identifier (`vol-1`, `vol-2`, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeId(String);

impl VolumeId {
    /// Wrap an id string
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for the 1-based seed position
    #[inline]
    #[must_use]
    pub fn seed(position: usize) -> Self {
        Self(format!("vol-{position}"))
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VolumeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VolumeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Which of the three texts of a volume is being shown or edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rendition {
    /// Classical source text (原文)
    #[default]
    Original,
    /// Annotations (注释)
    Annotation,
    /// Vernacular translation (译文)
    Translation,
}

impl Rendition {
    /// All renditions in tab order
    pub const ALL: [Rendition; 3] = [
        Rendition::Original,
        Rendition::Annotation,
        Rendition::Translation,
    ];

    /// Stable key used in URLs and storage
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Rendition::Original => "original",
            Rendition::Annotation => "annotation",
            Rendition::Translation => "translation",
        }
    }

    /// Tab label shown to readers and editors
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Rendition::Original => "原文",
            Rendition::Annotation => "注释",
            Rendition::Translation => "译文",
        }
    }

    /// Message shown by the reader when this rendition is blank
    #[must_use]
    pub fn empty_placeholder(self) -> String {
        format!("暂无{}内容", self.label())
    }

    /// Prompt shown in an empty editor surface
    #[must_use]
    pub fn editor_placeholder(self) -> String {
        format!("在此输入或粘贴{}...", self.label())
    }
}

impl std::fmt::Display for Rendition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Rendition {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(Rendition::Original),
            "annotation" => Ok(Rendition::Annotation),
            "translation" => Ok(Rendition::Translation),
            other => Err(RouteError::UnknownRendition(other.to_string())),
        }
    }
}

/// One gazetteer chapter with three HTML renditions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Unique id
    pub id: VolumeId,
    /// Display title (卷一, 卷二, ...)
    pub title: String,
    /// Classical source text
    #[serde(default)]
    pub original: String,
    /// Annotations
    #[serde(default)]
    pub annotation: String,
    /// Vernacular translation
    #[serde(default)]
    pub translation: String,
}

impl Volume {
    /// Create a volume with empty renditions
    #[must_use]
    pub fn new(id: impl Into<VolumeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            original: String::new(),
            annotation: String::new(),
            translation: String::new(),
        }
    }

    /// With a rendition set
    #[must_use]
    pub fn with_field(mut self, rendition: Rendition, html: impl Into<String>) -> Self {
        *self.field_mut(rendition) = html.into();
        self
    }

    /// Borrow one rendition
    #[inline]
    #[must_use]
    pub fn field(&self, rendition: Rendition) -> &str {
        match rendition {
            Rendition::Original => &self.original,
            Rendition::Annotation => &self.annotation,
            Rendition::Translation => &self.translation,
        }
    }

    /// Mutably borrow one rendition
    #[inline]
    pub fn field_mut(&mut self, rendition: Rendition) -> &mut String {
        match rendition {
            Rendition::Original => &mut self.original,
            Rendition::Annotation => &mut self.annotation,
            Rendition::Translation => &mut self.translation,
        }
    }

    /// Whether a rendition counts as blank for display
    #[inline]
    #[must_use]
    pub fn is_blank(&self, rendition: Rendition) -> bool {
        is_blank_html(self.field(rendition))
    }
}

impl From<String> for VolumeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Empty, whitespace-only, or the canonical blank paragraph
#[must_use]
pub fn is_blank_html(html: &str) -> bool {
    let trimmed = html.trim();
    trimmed.is_empty() || trimmed == BLANK_PARAGRAPH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendition_key_roundtrip() {
        for r in Rendition::ALL {
            assert_eq!(r.key().parse::<Rendition>().unwrap(), r);
        }
        assert!("commentary".parse::<Rendition>().is_err());
    }

    #[test]
    fn rendition_labels() {
        assert_eq!(Rendition::Annotation.empty_placeholder(), "暂无注释内容");
        assert_eq!(Rendition::Translation.editor_placeholder(), "在此输入或粘贴译文...");
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank_html(""));
        assert!(is_blank_html("   \n"));
        assert!(is_blank_html(BLANK_PARAGRAPH));
        assert!(!is_blank_html("<p>待录入...</p>"));
    }

    #[test]
    fn volume_field_access() {
        let mut vol = Volume::new("vol-9", "卷九").with_field(Rendition::Original, "<p>x</p>");
        assert_eq!(vol.field(Rendition::Original), "<p>x</p>");
        assert!(vol.is_blank(Rendition::Annotation));

        vol.field_mut(Rendition::Translation).push_str("<p>y</p>");
        assert_eq!(vol.translation, "<p>y</p>");
    }

    #[test]
    fn volume_deserializes_missing_fields_as_empty() {
        let vol: Volume = serde_json::from_str(r#"{"id":"vol-3","title":"卷三"}"#).unwrap();
        assert_eq!(vol.id.as_str(), "vol-3");
        assert_eq!(vol.annotation, "");
    }
}
