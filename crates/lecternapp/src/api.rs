//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single entry
//! point for the control surface, regardless of the UI driving it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the control state, the publish channel, history and the verse lookup
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (font size names, queue selectors given as position or id)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O to the user**: No stdout, stderr or formatting
//!
//! ## Generic Over Storage and Lookup
//!
//! `PresenterApi<B, L>` is generic over both collaborators:
//! - Production: `PresenterApi<FsBackend, HttpLookup>`
//! - Testing: `PresenterApi<MemBackend, MemLookup>`

use crate::channel::{NotifyBus, SurfaceId};
use crate::commands::{self, CmdMessage, CmdResult, ControlState};
use crate::error::{LecternError, Result};
use crate::history::HistoryStore;
use crate::lookup::VerseLookup;
use crate::model::{DisplaySettings, FontSize, Snapshot};
use crate::publish::PublishChannel;
use crate::selection::Modifiers;
use crate::store::StorageBackend;

pub struct PresenterApi<B: StorageBackend + Clone, L: VerseLookup> {
    state: ControlState,
    channel: PublishChannel<B>,
    history: HistoryStore<B>,
    lookup: L,
}

impl<B: StorageBackend + Clone, L: VerseLookup> PresenterApi<B, L> {
    /// Build a control surface. Saved preferences are applied over `defaults`.
    pub fn new(backend: B, lookup: L, defaults: DisplaySettings) -> Result<Self> {
        let channel = PublishChannel::new(backend.clone());
        Self::assemble(backend, lookup, defaults, channel)
    }

    /// Like [`PresenterApi::new`], also notifying in-process subscribers on `bus`.
    pub fn with_bus(
        backend: B,
        lookup: L,
        defaults: DisplaySettings,
        bus: NotifyBus,
    ) -> Result<Self> {
        let channel = PublishChannel::with_bus(backend.clone(), bus, SurfaceId::next());
        Self::assemble(backend, lookup, defaults, channel)
    }

    fn assemble(
        backend: B,
        lookup: L,
        defaults: DisplaySettings,
        channel: PublishChannel<B>,
    ) -> Result<Self> {
        let settings = commands::settings::load_preferences(&backend, defaults);
        let history = HistoryStore::load(backend)?;
        Ok(Self {
            state: ControlState::new(settings),
            channel,
            history,
            lookup,
        })
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.state.settings
    }

    pub fn backend(&self) -> &B {
        self.channel.backend()
    }

    pub fn surface(&self) -> SurfaceId {
        self.channel.surface()
    }

    pub fn live_snapshot(&self) -> Result<Option<Snapshot>> {
        self.channel.live()
    }

    // --- navigation ---

    pub fn select_book(&mut self, name: &str) -> CmdResult {
        commands::navigate::select_book(&mut self.state, name)
    }

    pub fn select_chapter(&mut self, chapter: u32) -> CmdResult {
        commands::navigate::select_chapter(&mut self.state, chapter)
    }

    pub fn select_verse(&mut self, verse: u32, modifiers: Modifiers) -> CmdResult {
        commands::navigate::select_verse(&mut self.state, &self.lookup, verse, modifiers)
    }

    pub fn commit(&mut self, verse: u32) -> Result<CmdResult> {
        commands::navigate::commit(
            &mut self.state,
            &self.channel,
            &mut self.history,
            &self.lookup,
            verse,
        )
    }

    pub fn search_books(&self, query: &str) -> CmdResult {
        commands::navigate::search_books(query)
    }

    // --- queue ---

    pub fn queue_current(&mut self) -> CmdResult {
        commands::queue::add_current(&mut self.state)
    }

    /// Remove a queued item by 1-based position or by id.
    pub fn unqueue(&mut self, selector: &str) -> CmdResult {
        let selector = selector.trim();
        match selector.parse::<usize>() {
            Ok(position) => commands::queue::remove_at(&mut self.state, position),
            Err(_) => commands::queue::remove(&mut self.state, selector),
        }
    }

    pub fn clear_queue(&mut self) -> CmdResult {
        commands::queue::clear(&mut self.state)
    }

    pub fn list_queue(&self) -> CmdResult {
        commands::queue::list(&self.state)
    }

    // --- notes ---

    pub fn preview_note(&mut self, title: &str, text: &str) -> CmdResult {
        commands::notes::preview_note(&mut self.state, title, text)
    }

    pub fn project_note(&mut self, title: &str, text: &str) -> Result<CmdResult> {
        commands::notes::project_note(
            &mut self.state,
            &self.channel,
            &mut self.history,
            title,
            text,
        )
    }

    pub fn queue_note(&mut self, title: &str, text: &str) -> CmdResult {
        commands::notes::queue_note(&mut self.state, title, text)
    }

    // --- live & history ---

    pub fn go_live(&mut self) -> Result<CmdResult> {
        commands::live::go_live(&mut self.state, &self.channel, &mut self.history)
    }

    pub fn history(&self) -> CmdResult {
        commands::live::list_history(&self.history)
    }

    pub fn replay(&mut self, position: usize) -> Result<CmdResult> {
        commands::live::replay(&mut self.state, &self.channel, &self.history, position)
    }

    pub fn clear_history(&mut self) -> Result<CmdResult> {
        commands::live::clear_history(&mut self.history)
    }

    /// Pick up history written by another process.
    pub fn reload_history(&mut self) -> Result<bool> {
        self.history.reload()
    }

    // --- settings ---

    pub fn set_font_size(&mut self, size: &str) -> CmdResult {
        match size.parse::<FontSize>() {
            Ok(size) => commands::settings::set_font_size(&mut self.state, size),
            Err(LecternError::InvalidInput(reason)) => {
                CmdResult::default().with_message(CmdMessage::warning(reason))
            }
            Err(e) => CmdResult::default().with_message(CmdMessage::error(e.to_string())),
        }
    }

    pub fn set_dark_mode(&mut self, dark: Option<bool>) -> Result<CmdResult> {
        commands::settings::set_dark_mode(&mut self.state, self.channel.backend(), dark)
    }

    pub fn set_version(&mut self, code: &str) -> Result<CmdResult> {
        commands::settings::set_version(
            &mut self.state,
            self.channel.backend(),
            &self.lookup,
            code,
        )
    }

    pub fn set_background_color(&mut self, color: Option<&str>) -> Result<CmdResult> {
        commands::settings::set_background_color(&self.channel, color)
    }

    pub fn set_background_image(&mut self, url: Option<&str>) -> Result<CmdResult> {
        commands::settings::set_background_image(&self.channel, url)
    }
}
