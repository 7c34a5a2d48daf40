//! Going live and working with history.
//!
//! [`go_live`] picks what to publish in priority order: the queue, then the staged
//! preview, then the current fetched text as a lone `single` item. Placeholder text is
//! never published.

use crate::commands::{CmdMessage, CmdResult, ControlState};
use crate::error::Result;
use crate::history::HistoryStore;
use crate::model::{ProjectableItem, ScriptureItem, Snapshot, SINGLE_ITEM_ID};
use crate::publish::PublishChannel;
use crate::store::StorageBackend;

pub fn go_live<B: StorageBackend>(
    state: &mut ControlState,
    channel: &PublishChannel<B>,
    history: &mut HistoryStore<B>,
) -> Result<CmdResult> {
    let items = match pending_items(state) {
        Some(items) => items,
        None => {
            return Ok(CmdResult::default()
                .with_message(CmdMessage::warning("Nothing to project: select a verse, note or queue first")))
        }
    };
    publish_and_record(state, channel, history, items)
}

fn pending_items(state: &ControlState) -> Option<Vec<ProjectableItem>> {
    if !state.queue.is_empty() {
        return Some(state.queue.clone());
    }
    if !state.preview.staged().is_empty() {
        return Some(state.preview.staged().to_vec());
    }
    state
        .preview
        .current()
        .filter(|current| !current.placeholder)
        .map(|current| {
            vec![ProjectableItem::Scripture(ScriptureItem {
                id: SINGLE_ITEM_ID.to_string(),
                location: state.selection.location(),
                text: current.text.clone(),
                reference: current.reference.clone(),
                version: Some(state.settings.version.clone()),
            })]
        })
}

/// Publish `items` as the live snapshot without touching history.
pub(crate) fn publish_items<B: StorageBackend>(
    state: &mut ControlState,
    channel: &PublishChannel<B>,
    items: Vec<ProjectableItem>,
) -> Result<Snapshot> {
    let snapshot = channel.publish(items, &state.settings)?;
    state.live = snapshot.items.clone();
    Ok(snapshot)
}

/// Publish `items` and record each of them in history, in order.
pub(crate) fn publish_and_record<B: StorageBackend>(
    state: &mut ControlState,
    channel: &PublishChannel<B>,
    history: &mut HistoryStore<B>,
    items: Vec<ProjectableItem>,
) -> Result<CmdResult> {
    let snapshot = publish_items(state, channel, items)?;
    for item in &snapshot.items {
        history.record_item(item)?;
    }

    let label = live_label(&snapshot);
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Live: {}", label)))
        .with_published(snapshot))
}

fn live_label(snapshot: &Snapshot) -> String {
    match snapshot.items.as_slice() {
        [] => "nothing".to_string(),
        [only] => only.reference().to_string(),
        [first, rest @ ..] => format!("{} (+{} more)", first.reference(), rest.len()),
    }
}

pub fn list_history<B: StorageBackend>(history: &HistoryStore<B>) -> CmdResult {
    let mut result = CmdResult::default().with_history(history.list().to_vec());
    if history.is_empty() {
        result.add_message(CmdMessage::info("History is empty"));
    }
    result
}

/// Put a history entry back on screen. Replays are not recorded again.
pub fn replay<B: StorageBackend>(
    state: &mut ControlState,
    channel: &PublishChannel<B>,
    history: &HistoryStore<B>,
    position: usize,
) -> Result<CmdResult> {
    let entry = match history.get(position) {
        Some(entry) => entry,
        None => {
            return Ok(CmdResult::default().with_message(CmdMessage::warning(format!(
                "No history entry {} (history has {})",
                position,
                history.len()
            ))))
        }
    };

    let item = entry.to_item(&state.settings.version);
    let snapshot = publish_items(state, channel, vec![item])?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Replayed: {}", entry.reference)))
        .with_published(snapshot))
}

pub fn clear_history<B: StorageBackend>(history: &mut HistoryStore<B>) -> Result<CmdResult> {
    let count = history.len();
    history.clear()?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Cleared {} history entries",
        count
    ))))
}
