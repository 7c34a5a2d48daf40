use crate::commands::{CmdMessage, CmdResult, ControlState};
use crate::model::ProjectableItem;

/// Queue whatever is staged in the preview, a passage or a note. Ids are derived from
/// the location for scripture, so the same verse or range can only be queued once.
pub fn add_current(state: &mut ControlState) -> CmdResult {
    let staged = state.preview.staged().to_vec();
    if staged.is_empty() {
        return CmdResult::default()
            .with_message(CmdMessage::warning("Nothing to queue: preview a verse or note first"));
    }

    let mut result = CmdResult::default();
    for item in staged {
        let pushed = push(state, item);
        result.messages.extend(pushed.messages);
        if !pushed.listed_items.is_empty() {
            result.listed_items = pushed.listed_items;
        }
    }
    result
}

pub(crate) fn push(state: &mut ControlState, item: ProjectableItem) -> CmdResult {
    if state.queue.iter().any(|queued| queued.id() == item.id()) {
        return CmdResult::default().with_message(CmdMessage::warning(format!(
            "{} is already queued",
            item.reference()
        )));
    }

    let message = CmdMessage::success(format!(
        "Queued {} ({} in queue)",
        item.reference(),
        state.queue.len() + 1
    ));
    state.queue.push(item);
    CmdResult::default()
        .with_message(message)
        .with_listed_items(state.queue.clone())
}

pub fn remove(state: &mut ControlState, id: &str) -> CmdResult {
    match state.queue.iter().position(|item| item.id() == id) {
        Some(index) => {
            let removed = state.queue.remove(index);
            CmdResult::default()
                .with_message(CmdMessage::success(format!("Removed {}", removed.reference())))
                .with_listed_items(state.queue.clone())
        }
        None => CmdResult::default()
            .with_message(CmdMessage::warning(format!("'{}' is not in the queue", id))),
    }
}

/// Remove by 1-based position.
pub fn remove_at(state: &mut ControlState, position: usize) -> CmdResult {
    let id = match position
        .checked_sub(1)
        .and_then(|i| state.queue.get(i))
        .map(|item| item.id().to_string())
    {
        Some(id) => id,
        None => {
            return CmdResult::default().with_message(CmdMessage::warning(format!(
                "No queue entry {} (queue has {})",
                position,
                state.queue.len()
            )))
        }
    };
    remove(state, &id)
}

pub fn clear(state: &mut ControlState) -> CmdResult {
    let count = state.queue.len();
    state.queue.clear();
    CmdResult::default().with_message(CmdMessage::success(format!(
        "Cleared {} queued items",
        count
    )))
}

pub fn list(state: &ControlState) -> CmdResult {
    let mut result = CmdResult::default().with_listed_items(state.queue.clone());
    if state.queue.is_empty() {
        result.add_message(CmdMessage::info("Queue is empty"));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::lookup;
    use crate::commands::{navigate, notes};
    use crate::selection::Modifiers;

    fn previewing(verse: u32) -> ControlState {
        let mut state = ControlState::default();
        navigate::select_book(&mut state, "John");
        navigate::select_chapter(&mut state, 3);
        navigate::select_verse(&mut state, &lookup(), verse, Modifiers::NONE);
        state
    }

    #[test]
    fn add_requires_a_preview() {
        let mut state = ControlState::default();
        assert!(add_current(&mut state).has_warnings());
        assert!(state.queue.is_empty());
    }

    #[test]
    fn placeholder_cannot_be_queued() {
        let mut state = previewing(30);
        assert!(add_current(&mut state).has_warnings());
        assert!(state.queue.is_empty());
    }

    #[test]
    fn previewed_note_is_queued() {
        let mut state = ControlState::default();
        notes::preview_note(&mut state, "Opening", "**Welcome**");
        let result = add_current(&mut state);
        assert!(!result.has_warnings());
        assert_eq!(state.queue.len(), 1);
        assert_eq!(state.queue[0].reference(), "Opening");
        assert_eq!(state.queue[0].text(), "**Welcome**");

        assert!(add_current(&mut state).has_warnings());
        assert_eq!(state.queue.len(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut state = previewing(16);
        add_current(&mut state);
        let result = add_current(&mut state);
        assert!(result.has_warnings());
        assert_eq!(state.queue.len(), 1);
    }

    #[test]
    fn range_and_verse_queue_separately() {
        let mut state = previewing(16);
        add_current(&mut state);
        navigate::select_verse(&mut state, &lookup(), 17, Modifiers::SHIFT);
        add_current(&mut state);
        let ids: Vec<&str> = state.queue.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["John-3-16", "John-3-16-17"]);
    }

    #[test]
    fn remove_by_id_and_position() {
        let mut state = previewing(16);
        add_current(&mut state);
        navigate::select_verse(&mut state, &lookup(), 17, Modifiers::NONE);
        add_current(&mut state);
        navigate::select_verse(&mut state, &lookup(), 18, Modifiers::NONE);
        add_current(&mut state);

        remove(&mut state, "John-3-17");
        assert_eq!(state.queue.len(), 2);
        assert!(remove(&mut state, "John-3-17").has_warnings());

        remove_at(&mut state, 2);
        assert_eq!(state.queue[0].id(), "John-3-16");
        assert_eq!(state.queue.len(), 1);
        assert!(remove_at(&mut state, 0).has_warnings());
    }

    #[test]
    fn clear_and_list() {
        let mut state = previewing(16);
        add_current(&mut state);
        assert_eq!(list(&state).listed_items.len(), 1);
        clear(&mut state);
        assert!(state.queue.is_empty());
        assert!(list(&state).listed_items.is_empty());
    }
}
