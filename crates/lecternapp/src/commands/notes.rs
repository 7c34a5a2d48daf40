//! Free-form notes. Note text is markdown; the title becomes the reference.
//!
//! A note needs a title or text. Queued notes without a title are labelled
//! [`DEFAULT_NOTE_REFERENCE`].

use crate::commands::{live, queue, CmdMessage, CmdResult, ControlState};
use crate::error::Result;
use crate::history::HistoryStore;
use crate::model::{NoteItem, ProjectableItem, DEFAULT_NOTE_REFERENCE};
use crate::publish::PublishChannel;
use crate::store::StorageBackend;

fn empty_note() -> CmdResult {
    CmdResult::default().with_message(CmdMessage::warning("A note needs a title or some text"))
}

fn normalize<'a>(title: &'a str, text: &'a str) -> Option<(&'a str, &'a str)> {
    let (title, text) = (title.trim(), text.trim());
    if title.is_empty() && text.is_empty() {
        None
    } else {
        Some((title, text))
    }
}

pub fn preview_note(state: &mut ControlState, title: &str, text: &str) -> CmdResult {
    let (title, text) = match normalize(title, text) {
        Some(note) => note,
        None => return empty_note(),
    };
    let item = ProjectableItem::Note(NoteItem::new(title, text));
    state.preview.stage(item.clone());
    CmdResult::default()
        .with_message(CmdMessage::info("Previewing note"))
        .with_listed_items(vec![item])
}

/// Publish a note straight away, bypassing preview and queue.
pub fn project_note<B: StorageBackend>(
    state: &mut ControlState,
    channel: &PublishChannel<B>,
    history: &mut HistoryStore<B>,
    title: &str,
    text: &str,
) -> Result<CmdResult> {
    let (title, text) = match normalize(title, text) {
        Some(note) => note,
        None => return Ok(empty_note()),
    };
    let item = ProjectableItem::Note(NoteItem::new(title, text));
    live::publish_and_record(state, channel, history, vec![item])
}

pub fn queue_note(state: &mut ControlState, title: &str, text: &str) -> CmdResult {
    let (title, text) = match normalize(title, text) {
        Some(note) => note,
        None => return empty_note(),
    };
    let reference = if title.is_empty() {
        DEFAULT_NOTE_REFERENCE
    } else {
        title
    };
    queue::push(state, ProjectableItem::Note(NoteItem::new(reference, text)))
}
