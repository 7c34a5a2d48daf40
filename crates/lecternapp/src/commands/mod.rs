//! # Command Layer
//!
//! This module contains the **control-surface logic** of lectern. Each group of
//! operations lives in its own submodule as plain functions over [`ControlState`] and
//! the collaborators they need (publish channel, history, lookup).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Drive the selection state machine and stage previews
//! - Decide what goes live and record it in history
//! - Return structured [`CmdResult`]s with messages and affected data
//! - Stay UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! - **Terminal I/O**: no stdout, stderr or formatting
//! - **Argument parsing**: that's the CLI layer's job
//! - **Fatal lookup errors**: lookups degrade to placeholder text
//!
//! Invalid navigation (unknown book, chapter out of range, nothing to publish) is not an
//! error either. It comes back as a warning message with the state untouched. Only
//! storage failures surface as `Err`.
//!
//! ## Command Modules
//!
//! - [`navigate`]: Book, chapter and verse selection, double-click commit, book search
//! - [`queue`]: The ordered list awaiting one combined publish
//! - [`notes`]: Preview, project and queue free-form notes
//! - [`live`]: Go live, history listing, replay and clearing
//! - [`settings`]: Font size, dark mode, version and background overrides

use crate::catalog::Book;
use crate::lookup::VerseLookup;
use crate::model::{DisplaySettings, HistoryItem, ProjectableItem, Snapshot};
use crate::selection::{FetchRequest, PreviewSlot, SelectionState};
use serde::Serialize;

pub mod live;
pub mod navigate;
pub mod notes;
pub mod queue;
pub mod settings;

/// Everything the control surface holds in memory.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    pub selection: SelectionState,
    pub preview: PreviewSlot,
    pub queue: Vec<ProjectableItem>,
    pub live: Vec<ProjectableItem>,
    pub settings: DisplaySettings,
}

impl ControlState {
    pub fn new(settings: DisplaySettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Book search results, split by testament.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMatches {
    pub old: Vec<Book>,
    pub new: Vec<Book>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// The snapshot that went live, when the command published one.
    pub published: Option<Snapshot>,
    pub listed_items: Vec<ProjectableItem>,
    pub history: Vec<HistoryItem>,
    pub books: Option<BookMatches>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_published(mut self, snapshot: Snapshot) -> Self {
        self.published = Some(snapshot);
        self
    }

    pub fn with_listed_items(mut self, items: Vec<ProjectableItem>) -> Self {
        self.listed_items = items;
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryItem>) -> Self {
        self.history = history;
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.level, MessageLevel::Warning | MessageLevel::Error))
    }
}

/// Run a fetch and store its outcome in the preview slot.
///
/// Returns true when the preview now holds real text rather than a placeholder.
pub(crate) fn fetch_into_preview<L: VerseLookup + ?Sized>(
    state: &mut ControlState,
    lookup: &L,
    request: &FetchRequest,
    result: &mut CmdResult,
) -> bool {
    let ticket = state.preview.begin();
    let fetched = request.run(lookup, &state.settings.version);
    if !state.preview.complete(ticket, request, fetched) {
        return false;
    }

    match state.preview.current() {
        Some(current) if current.placeholder => {
            result.add_message(CmdMessage::warning(format!(
                "{}: {}",
                current.reference, current.text
            )));
            false
        }
        Some(current) => {
            result.add_message(CmdMessage::info(format!("Previewing {}", current.reference)));
            result.listed_items = state.preview.staged().to_vec();
            true
        }
        None => false,
    }
}
