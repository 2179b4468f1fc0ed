//! Rich text editor
//!
//! An editable surface bound to one HTML string. User input replaces the
//! surface verbatim; toolbar commands run through the block [`Document`]
//! model. External value changes are gated by focus:
//!
//! ```text
//!            focus / input / exec
//!   Idle ─────────────────────────▶ Editing
//!    ▲                                 │
//!    └──────────── blur ───────────────┘
//!        (applies a deferred external value)
//! ```
//!
//! In `Idle` an external value overwrites the surface at once; in `Editing`
//! it is deferred until blur so in-progress edits are not clobbered.

pub mod command;
pub mod document;

pub use command::{FormatCommand, Selection, ToolbarButton, TOOLBAR};
pub use document::{Block, BlockKind, Document, ListKind};

/// Focus state of the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    /// Not focused; external values apply immediately
    #[default]
    Idle,
    /// Focused; external values wait for blur
    Editing,
}

/// Result of pushing an external value into the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Surface overwritten
    Applied,
    /// Surface already held the value
    Unchanged,
    /// Editor focused; value held until blur
    Deferred,
}

/// Editable HTML surface
#[derive(Debug, Clone)]
pub struct RichEditor {
    html: String,
    state: EditorState,
    pending: Option<String>,
    placeholder: String,
}

impl RichEditor {
    /// Create an idle editor showing `value`
    #[must_use]
    pub fn new(value: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            html: value.into(),
            state: EditorState::Idle,
            pending: None,
            placeholder: placeholder.into(),
        }
    }

    /// Current surface HTML
    #[inline]
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Placeholder shown while the surface is empty
    #[inline]
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Focus state
    #[inline]
    #[must_use]
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Whether the surface has input focus
    #[inline]
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.state == EditorState::Editing
    }

    /// Whether an external value is waiting for blur
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take focus
    pub fn focus(&mut self) {
        if self.state == EditorState::Idle {
            tracing::trace!("editor focused");
            self.state = EditorState::Editing;
        }
    }

    /// Drop focus, applying any deferred external value
    ///
    /// Returns the new surface HTML when blur changed it.
    pub fn blur(&mut self) -> Option<&str> {
        if self.state == EditorState::Idle {
            return None;
        }
        self.state = EditorState::Idle;
        tracing::trace!("editor blurred");

        match self.pending.take() {
            Some(value) if value != self.html => {
                self.html = value;
                Some(&self.html)
            }
            _ => None,
        }
    }

    /// Push an external value into the surface
    pub fn sync_external(&mut self, value: &str) -> SyncOutcome {
        match self.state {
            EditorState::Editing => {
                self.pending = Some(value.to_string());
                SyncOutcome::Deferred
            }
            EditorState::Idle if self.html == value => SyncOutcome::Unchanged,
            EditorState::Idle => {
                self.html = value.to_string();
                SyncOutcome::Applied
            }
        }
    }

    /// Record user input; returns the HTML for the change callback
    ///
    /// Typing implies focus. The surface content is taken verbatim.
    pub fn input(&mut self, html: impl Into<String>) -> &str {
        self.focus();
        self.pending = None;
        self.html = html.into();
        &self.html
    }

    /// Run a toolbar command; `None` when it was a no-op
    pub fn exec(&mut self, command: &FormatCommand, selection: Selection) -> Option<&str> {
        self.focus();
        let mut document = Document::parse(&self.html);
        if !document.apply(command, selection) {
            tracing::debug!(command = command.name(), "format command was a no-op");
            return None;
        }
        self.pending = None;
        self.html = document.render();
        tracing::debug!(command = command.name(), blocks = document.len(), "format command applied");
        Some(&self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_sync_applies() {
        let mut editor = RichEditor::new("<p>a</p>", "");
        assert_eq!(editor.sync_external("<p>a</p>"), SyncOutcome::Unchanged);
        assert_eq!(editor.sync_external("<p>b</p>"), SyncOutcome::Applied);
        assert_eq!(editor.html(), "<p>b</p>");
    }

    #[test]
    fn editing_defers_external_value_until_blur() {
        let mut editor = RichEditor::new("<p>a</p>", "");
        editor.focus();
        editor.input("<p>typing</p>");

        assert_eq!(editor.sync_external("<p>remote</p>"), SyncOutcome::Deferred);
        assert_eq!(editor.html(), "<p>typing</p>");
        assert!(editor.has_pending());

        assert_eq!(editor.blur(), Some("<p>remote</p>"));
        assert_eq!(editor.state(), EditorState::Idle);
    }

    #[test]
    fn input_after_deferred_value_wins() {
        let mut editor = RichEditor::new("", "");
        editor.focus();
        editor.sync_external("<p>remote</p>");
        editor.input("<p>mine</p>");

        assert_eq!(editor.blur(), None);
        assert_eq!(editor.html(), "<p>mine</p>");
    }

    #[test]
    fn blur_with_matching_value_is_quiet() {
        let mut editor = RichEditor::new("", "");
        editor.input("<p>x</p>");
        editor.sync_external("<p>x</p>");
        assert_eq!(editor.blur(), None);
        assert_eq!(editor.blur(), None);
    }

    #[test]
    fn exec_focuses_and_reports_change() {
        let mut editor = RichEditor::new("<p>字</p>", "");
        assert_eq!(
            editor.exec(&FormatCommand::Underline, Selection::all()),
            Some("<p><u>字</u></p>")
        );
        assert!(editor.is_focused());
    }

    #[test]
    fn exec_noop_keeps_surface_verbatim() {
        let mut editor = RichEditor::new("<p>raw  spacing</p>\n", "");
        assert_eq!(editor.exec(&FormatCommand::InsertImage(None), Selection::all()), None);
        assert_eq!(editor.html(), "<p>raw  spacing</p>\n");
    }
}
