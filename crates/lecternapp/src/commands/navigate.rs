use crate::catalog::{find_book, search_books as catalog_search};
use crate::commands::{fetch_into_preview, live, BookMatches, CmdMessage, CmdResult, ControlState};
use crate::error::Result;
use crate::history::HistoryStore;
use crate::lookup::VerseLookup;
use crate::publish::PublishChannel;
use crate::selection::Modifiers;
use crate::store::StorageBackend;

pub fn select_book(state: &mut ControlState, name: &str) -> CmdResult {
    let book = match find_book(name) {
        Some(book) => book,
        None => {
            return CmdResult::default()
                .with_message(CmdMessage::warning(format!("No book matches '{}'", name.trim())))
        }
    };

    let (next, _) = std::mem::take(&mut state.selection).select_book(book);
    state.selection = next;
    state.preview.invalidate();

    CmdResult::default().with_message(CmdMessage::success(format!(
        "{} ({} chapters)",
        book.name,
        book.chapters()
    )))
}

pub fn select_chapter(state: &mut ControlState, chapter: u32) -> CmdResult {
    let book = match state.selection.book() {
        Some(book) => book,
        None => {
            return CmdResult::default().with_message(CmdMessage::warning("Choose a book first"))
        }
    };
    if chapter == 0 || chapter > book.chapters() {
        return CmdResult::default().with_message(CmdMessage::warning(format!(
            "{} has chapters 1-{}",
            book.name,
            book.chapters()
        )));
    }

    let (next, _) = std::mem::take(&mut state.selection).select_chapter(chapter);
    state.selection = next;
    state.preview.invalidate();

    CmdResult::default().with_message(CmdMessage::success(format!("{} {}", book.name, chapter)))
}

fn verse_guard(state: &ControlState, verse: u32) -> Option<CmdResult> {
    let (book, chapter) = match (state.selection.book(), state.selection.chapter()) {
        (Some(book), Some(chapter)) => (book, chapter),
        _ => {
            return Some(
                CmdResult::default()
                    .with_message(CmdMessage::warning("Choose a book and chapter first")),
            )
        }
    };
    if verse == 0 {
        return Some(CmdResult::default().with_message(CmdMessage::warning("Verses start at 1")));
    }
    match book.verse_count(chapter) {
        Some(count) if verse <= count => None,
        Some(count) => Some(CmdResult::default().with_message(CmdMessage::warning(format!(
            "{} {} has verses 1-{}",
            book.name, chapter, count
        )))),
        None => Some(CmdResult::default().with_message(CmdMessage::warning(format!(
            "{} has no chapter {}",
            book.name, chapter
        )))),
    }
}

/// Choose a verse. With shift and an anchor this extends to a range.
pub fn select_verse<L: VerseLookup + ?Sized>(
    state: &mut ControlState,
    lookup: &L,
    verse: u32,
    modifiers: Modifiers,
) -> CmdResult {
    if let Some(rejected) = verse_guard(state, verse) {
        return rejected;
    }

    let (next, fetch) = std::mem::take(&mut state.selection).select_verse(verse, modifiers);
    state.selection = next;

    let mut result = CmdResult::default();
    if let Some(request) = fetch {
        fetch_into_preview(state, lookup, &request, &mut result);
    }
    result
}

/// Double-click: publish the previewed range when `verse` lies inside it, otherwise
/// select `verse` alone and publish it once its text arrives.
pub fn commit<B: StorageBackend, L: VerseLookup + ?Sized>(
    state: &mut ControlState,
    channel: &PublishChannel<B>,
    history: &mut HistoryStore<B>,
    lookup: &L,
    verse: u32,
) -> Result<CmdResult> {
    if let Some(rejected) = verse_guard(state, verse) {
        return Ok(rejected);
    }

    if state.selection.range_contains(verse) && state.preview.scripture().is_some() {
        let items = state.preview.staged().to_vec();
        return live::publish_and_record(state, channel, history, items);
    }

    let mut result = select_verse(state, lookup, verse, Modifiers::NONE);
    if state.preview.scripture().is_none() {
        return Ok(result);
    }

    let items = state.preview.staged().to_vec();
    let published = live::publish_and_record(state, channel, history, items)?;
    result.messages.extend(published.messages);
    result.published = published.published;
    Ok(result)
}

/// Case-insensitive substring search over book names.
pub fn search_books(query: &str) -> CmdResult {
    let (old, new) = catalog_search(query);
    let mut result = CmdResult::default();
    if old.is_empty() && new.is_empty() {
        result.add_message(CmdMessage::info(format!("No books match '{}'", query.trim())));
    }
    result.books = Some(BookMatches { old, new });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::lookup;
    use crate::commands::MessageLevel;
    use crate::model::ItemKind;
    use crate::selection::{Phase, VERSE_MISSING_TEXT};
    use crate::store::mem_backend::MemBackend;

    struct Env {
        state: ControlState,
        channel: PublishChannel<MemBackend>,
        history: HistoryStore<MemBackend>,
    }

    fn env() -> Env {
        let backend = MemBackend::new();
        Env {
            state: ControlState::default(),
            channel: PublishChannel::new(backend.clone()),
            history: HistoryStore::load(backend).unwrap(),
        }
    }

    fn at_john_3(state: &mut ControlState) {
        select_book(state, "john");
        select_chapter(state, 3);
    }

    #[test]
    fn unknown_book_is_a_warning() {
        let mut state = ControlState::default();
        let result = select_book(&mut state, "Hezekiah");
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(state.selection.phase(), Phase::Idle);
    }

    #[test]
    fn chapter_out_of_range_keeps_state() {
        let mut state = ControlState::default();
        select_book(&mut state, "Ruth");
        let result = select_chapter(&mut state, 5);
        assert!(result.has_warnings());
        assert_eq!(state.selection.chapter(), None);
    }

    #[test]
    fn verse_before_chapter_is_rejected() {
        let mut state = ControlState::default();
        let result = select_verse(&mut state, &lookup(), 16, Modifiers::NONE);
        assert!(result.has_warnings());
        assert_eq!(state.selection.verse(), None);
    }

    #[test]
    fn plain_select_stages_a_preview() {
        let mut state = ControlState::default();
        at_john_3(&mut state);
        let result = select_verse(&mut state, &lookup(), 16, Modifiers::NONE);
        assert_eq!(result.listed_items.len(), 1);
        assert_eq!(state.preview.scripture().unwrap().id, "John-3-16");
    }

    #[test]
    fn missing_verse_shows_placeholder() {
        let mut state = ControlState::default();
        at_john_3(&mut state);
        let result = select_verse(&mut state, &lookup(), 30, Modifiers::NONE);
        assert!(result.has_warnings());
        assert_eq!(state.preview.current().unwrap().text, VERSE_MISSING_TEXT);
        assert!(state.preview.staged().is_empty());
    }

    #[test]
    fn verse_past_chapter_end_is_rejected() {
        let mut state = ControlState::default();
        let lookup = lookup();
        at_john_3(&mut state);
        select_verse(&mut state, &lookup, 16, Modifiers::NONE);
        let requests_before = lookup.requests().len();

        let result = select_verse(&mut state, &lookup, 200_000, Modifiers::SHIFT);
        assert!(result.has_warnings());
        assert_eq!(result.messages[0].content, "John 3 has verses 1-36");
        assert_eq!(state.selection.verse(), Some(16));
        assert_eq!(state.selection.active_range(), None);
        assert_eq!(lookup.requests().len(), requests_before);
        assert_eq!(state.preview.scripture().unwrap().reference, "John 3:16");
    }

    #[test]
    fn commit_past_chapter_end_publishes_nothing() {
        let mut env = env();
        let lookup = lookup();
        at_john_3(&mut env.state);
        let result = commit(&mut env.state, &env.channel, &mut env.history, &lookup, 37).unwrap();
        assert!(result.has_warnings());
        assert!(result.published.is_none());
        assert!(lookup.requests().is_empty());
        assert!(env.history.is_empty());
    }

    #[test]
    fn changing_book_drops_preview() {
        let mut state = ControlState::default();
        at_john_3(&mut state);
        select_verse(&mut state, &lookup(), 16, Modifiers::NONE);
        select_book(&mut state, "Genesis");
        assert!(state.preview.current().is_none());
        assert!(state.preview.staged().is_empty());
    }

    #[test]
    fn commit_inside_range_publishes_the_range() {
        let mut env = env();
        let lookup = lookup();
        at_john_3(&mut env.state);
        select_verse(&mut env.state, &lookup, 16, Modifiers::NONE);
        select_verse(&mut env.state, &lookup, 18, Modifiers::SHIFT);
        let requests_before = lookup.requests().len();

        let result = commit(&mut env.state, &env.channel, &mut env.history, &lookup, 17).unwrap();
        let snapshot = result.published.unwrap();
        assert_eq!(snapshot.items[0].id(), "John-3-16-18");
        assert_eq!(lookup.requests().len(), requests_before);
        assert_eq!(env.history.list()[0].reference, "John 3:16-18");
        assert_eq!(env.history.list()[0].kind, ItemKind::Scripture);
        assert_eq!(env.state.live, snapshot.items);
    }

    #[test]
    fn commit_outside_range_publishes_single_verse() {
        let mut env = env();
        let lookup = lookup();
        at_john_3(&mut env.state);
        select_verse(&mut env.state, &lookup, 16, Modifiers::NONE);
        select_verse(&mut env.state, &lookup, 17, Modifiers::SHIFT);

        let result = commit(&mut env.state, &env.channel, &mut env.history, &lookup, 18).unwrap();
        let snapshot = result.published.unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].id(), "John-3-18");
        assert_eq!(env.state.selection.active_range(), None);
    }

    #[test]
    fn commit_on_missing_verse_publishes_nothing() {
        let mut env = env();
        at_john_3(&mut env.state);
        let result = commit(&mut env.state, &env.channel, &mut env.history, &lookup(), 30).unwrap();
        assert!(result.published.is_none());
        assert!(env.channel.live().unwrap().is_none());
        assert!(env.history.is_empty());
    }

    #[test]
    fn book_search_splits_testaments() {
        let result = search_books("jo");
        let books = result.books.unwrap();
        let old: Vec<&str> = books.old.iter().map(|b| b.name).collect();
        let new: Vec<&str> = books.new.iter().map(|b| b.name).collect();
        assert_eq!(old, vec!["Joshua", "Job", "Joel", "Jonah"]);
        assert_eq!(new, vec!["John", "1 John", "2 John", "3 John"]);
    }
}
