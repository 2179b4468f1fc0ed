//! Admin dashboard
//!
//! Binds the rich text editor to one (volume, rendition) pair and turns the
//! editor buffer into updated volumes for the store.
//!
//! # Workflow
//! 1. Select a volume and a tab; the buffer resets to the stored field
//! 2. Edit or format; the buffer follows the editor
//! 3. Save; the caller writes the returned volume to the store
//!
//! AI assist is split into [`AdminDashboard::begin_assist`] and
//! [`AdminDashboard::finish_assist`] so the caller can release the dashboard
//! while the generation request is outstanding. Switching volume or tab
//! discards unsaved buffer edits and abandons any outstanding request; its
//! result is dropped when it arrives.

use crate::editor::{FormatCommand, RichEditor, Selection};
use crate::error::DashboardError;
use crate::types::{is_blank_html, Rendition, Volume, VolumeId};
use std::time::{Duration, Instant};

/// How long the saving indicator stays on after a save
pub const SAVE_INDICATOR: Duration = Duration::from_millis(500);

/// Rendition an AI draft can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistTarget {
    /// Draft annotations as an HTML list
    Annotation,
    /// Draft a vernacular translation
    Translation,
}

impl AssistTarget {
    /// Rendition the draft fills
    #[inline]
    #[must_use]
    pub fn rendition(self) -> Rendition {
        match self {
            AssistTarget::Annotation => Rendition::Annotation,
            AssistTarget::Translation => Rendition::Translation,
        }
    }
}

impl TryFrom<Rendition> for AssistTarget {
    type Error = DashboardError;

    fn try_from(rendition: Rendition) -> Result<Self, Self::Error> {
        match rendition {
            Rendition::Original => Err(DashboardError::AssistOnOriginal),
            Rendition::Annotation => Ok(AssistTarget::Annotation),
            Rendition::Translation => Ok(AssistTarget::Translation),
        }
    }
}

/// Work order for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistRequest {
    /// Identifies this request to [`AdminDashboard::finish_assist`]
    pub ticket: u64,
    /// Volume the draft is for
    pub volume: VolumeId,
    /// Rendition the draft fills
    pub target: AssistTarget,
    /// Source text handed to the generator
    pub original: String,
}

/// How a finished generation call affected the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistOutcome {
    /// Buffer replaced with the draft (not saved)
    Applied,
    /// Generation failed; buffer untouched
    Failed(String),
}

/// Editing dashboard state
#[derive(Debug, Clone)]
pub struct AdminDashboard {
    selected: VolumeId,
    tab: Rendition,
    buffer: String,
    editor: RichEditor,
    saving_until: Option<Instant>,
    save_indicator: Duration,
    assist_pending: Option<u64>,
    next_ticket: u64,
}

impl AdminDashboard {
    /// Select the first volume on the original tab
    ///
    /// # Errors
    /// `DashboardError::NoVolumes` for an empty collection
    pub fn new(volumes: &[Volume]) -> Result<Self, DashboardError> {
        let first = volumes.first().ok_or(DashboardError::NoVolumes)?;
        let tab = Rendition::default();
        let buffer = first.field(tab).to_string();
        Ok(Self {
            selected: first.id.clone(),
            tab,
            editor: RichEditor::new(buffer.clone(), tab.editor_placeholder()),
            buffer,
            saving_until: None,
            save_indicator: SAVE_INDICATOR,
            assist_pending: None,
            next_ticket: 0,
        })
    }

    /// With a different saving-indicator delay
    #[must_use]
    pub fn with_save_indicator(mut self, delay: Duration) -> Self {
        self.save_indicator = delay;
        self
    }

    /// Selected volume id
    #[inline]
    #[must_use]
    pub fn selected_id(&self) -> &VolumeId {
        &self.selected
    }

    /// Selected tab
    #[inline]
    #[must_use]
    pub fn tab(&self) -> Rendition {
        self.tab
    }

    /// Unsaved editor buffer
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The bound editor
    #[inline]
    #[must_use]
    pub fn editor(&self) -> &RichEditor {
        &self.editor
    }

    /// Whether a generation request is outstanding
    #[inline]
    #[must_use]
    pub fn is_ai_loading(&self) -> bool {
        self.assist_pending.is_some()
    }

    /// Whether the saving indicator is on at `now`
    #[must_use]
    pub fn is_saving_at(&self, now: Instant) -> bool {
        self.saving_until.is_some_and(|until| now < until)
    }

    /// Whether the saving indicator is on
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.is_saving_at(Instant::now())
    }

    /// Whether the AI button is offered for the current tab and volume
    #[must_use]
    pub fn can_assist(&self, volumes: &[Volume]) -> bool {
        self.tab != Rendition::Original
            && !self.is_ai_loading()
            && self
                .active(volumes)
                .is_ok_and(|v| !is_blank_html(&v.original))
    }

    /// Switch volume, discarding unsaved edits
    pub fn select_volume(&mut self, volumes: &[Volume], id: &VolumeId) -> Result<(), DashboardError> {
        if !volumes.iter().any(|v| &v.id == id) {
            return Err(DashboardError::VolumeNotFound(id.clone()));
        }
        self.selected = id.clone();
        self.rebind(volumes)
    }

    /// Switch tab, discarding unsaved edits
    pub fn select_tab(&mut self, volumes: &[Volume], tab: Rendition) -> Result<(), DashboardError> {
        self.tab = tab;
        self.rebind(volumes)
    }

    /// Record user input from the editor surface
    pub fn edit(&mut self, html: impl Into<String>) {
        self.buffer = self.editor.input(html).to_string();
    }

    /// Run a toolbar command; `false` when it was a no-op
    pub fn format(&mut self, command: &FormatCommand, selection: Selection) -> bool {
        match self.editor.exec(command, selection) {
            Some(html) => {
                self.buffer = html.to_string();
                true
            }
            None => false,
        }
    }

    /// Editor lost focus
    pub fn blur(&mut self) {
        if let Some(html) = self.editor.blur() {
            self.buffer = html.to_string();
        }
    }

    /// Merge the buffer into the selected volume's active field
    ///
    /// Returns the updated volume for the store and turns on the saving
    /// indicator. The indicator is feedback only.
    pub fn save(&mut self, volumes: &[Volume]) -> Result<Volume, DashboardError> {
        let mut updated = self.active(volumes)?.clone();
        *updated.field_mut(self.tab) = self.buffer.clone();
        self.saving_until = Some(Instant::now() + self.save_indicator);
        tracing::info!(volume = %self.selected, rendition = %self.tab, "dashboard save");
        Ok(updated)
    }

    /// Check preconditions and mark a generation request outstanding
    ///
    /// # Errors
    /// State is unchanged on every error:
    /// - `AssistInFlight` while another request is outstanding
    /// - `AssistOnOriginal` on the original tab
    /// - `OriginalEmpty` when the volume has no original text
    /// - `NotConfirmed` without the overwrite confirmation
    pub fn begin_assist(&mut self, volumes: &[Volume], confirmed: bool) -> Result<AssistRequest, DashboardError> {
        if self.is_ai_loading() {
            return Err(DashboardError::AssistInFlight);
        }
        let target = AssistTarget::try_from(self.tab)?;
        let volume = self.active(volumes)?;
        if is_blank_html(&volume.original) {
            return Err(DashboardError::OriginalEmpty);
        }
        if !confirmed {
            return Err(DashboardError::NotConfirmed);
        }

        self.next_ticket += 1;
        let request = AssistRequest {
            ticket: self.next_ticket,
            volume: volume.id.clone(),
            target,
            original: volume.original.clone(),
        };
        self.assist_pending = Some(request.ticket);
        tracing::info!(volume = %request.volume, rendition = %self.tab, "AI assist started");
        Ok(request)
    }

    /// Apply the result of `request`
    ///
    /// On success the buffer takes the draft; on failure it is untouched and
    /// the error's message is returned for display. Either way the loading
    /// flag clears.
    ///
    /// # Errors
    /// `StaleAssist` when `request` is no longer outstanding because the user
    /// switched volume or tab since it began. The result is dropped and state
    /// is unchanged.
    pub fn finish_assist<E: std::fmt::Display>(
        &mut self,
        request: &AssistRequest,
        result: Result<String, E>,
    ) -> Result<AssistOutcome, DashboardError> {
        let (volume, rendition) = (request.volume.clone(), request.target.rendition());
        if self.assist_pending != Some(request.ticket) {
            tracing::warn!(volume = %volume, rendition = %rendition, "dropping stale AI result");
            return Err(DashboardError::StaleAssist { volume, rendition });
        }
        self.assist_pending = None;

        match result {
            Ok(draft) => {
                self.buffer = draft;
                self.editor.sync_external(&self.buffer);
                tracing::info!(volume = %volume, rendition = %rendition, "AI draft applied");
                Ok(AssistOutcome::Applied)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(volume = %volume, error = %message, "AI assist failed");
                Ok(AssistOutcome::Failed(message))
            }
        }
    }

    fn active<'a>(&self, volumes: &'a [Volume]) -> Result<&'a Volume, DashboardError> {
        volumes
            .iter()
            .find(|v| v.id == self.selected)
            .ok_or_else(|| DashboardError::VolumeNotFound(self.selected.clone()))
    }

    fn rebind(&mut self, volumes: &[Volume]) -> Result<(), DashboardError> {
        let field = self.active(volumes)?.field(self.tab).to_string();
        tracing::debug!(volume = %self.selected, rendition = %self.tab, "dashboard rebound");
        if let Some(ticket) = self.assist_pending.take() {
            tracing::debug!(ticket, "abandoning outstanding AI request");
        }
        self.editor = RichEditor::new(field.clone(), self.tab.editor_placeholder());
        self.buffer = field;
        Ok(())
    }
}
