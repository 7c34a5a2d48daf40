//! # Selection State Machine
//!
//! Navigation on the control surface is a small state machine:
//!
//! ```text
//! Idle → BookChosen → ChapterChosen → VerseChosen ⇄ RangeChosen
//!   ↑________________ select_book (any state) ____________|
//! ```
//!
//! [`SelectionState`] is a plain value. Each transition consumes it and returns the next
//! state plus an optional [`FetchRequest`] describing what text the caller should look
//! up. Nothing here performs I/O, which keeps the rules easy to test in isolation.
//!
//! ## Guards
//!
//! Invalid navigation is a no-op rather than an error: choosing a chapter with no book,
//! a chapter past the end of the book, or a verse before a chapter is chosen returns
//! the state unchanged and no fetch.
//!
//! ## Ranges
//!
//! A plain verse choice sets the anchor (`range_start`). A shift-choice with an anchor
//! extends to `lo..=hi`, where `lo`/`hi` are the min/max of anchor and target, so the
//! result does not depend on direction. The new anchor is `lo`.
//!
//! ## Fetch Tickets
//!
//! Fetches may complete out of order when several are in flight. [`PreviewSlot`] hands
//! out a [`FetchTicket`] per fetch; only the most recent ticket may write the preview.

use crate::catalog::Book;
use crate::lookup::{self, Fetched, VerseLookup};
use crate::model::{range_reference, ProjectableItem, ScriptureItem, VerseRef};

pub const VERSE_ERROR_TEXT: &str = "Error fetching verse. Please try again.";
pub const RANGE_ERROR_TEXT: &str = "Error fetching verses. Please try again.";
pub const VERSE_MISSING_TEXT: &str = "Verse not found";
pub const RANGE_MISSING_TEXT: &str = "Verses not found";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    BookChosen,
    ChapterChosen,
    VerseChosen,
    RangeChosen,
}

/// What text to look up after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    Verse {
        book: Book,
        chapter: u32,
        verse: u32,
    },
    Range {
        book: Book,
        chapter: u32,
        lo: u32,
        hi: u32,
    },
}

impl FetchRequest {
    pub fn reference(&self) -> String {
        match *self {
            FetchRequest::Verse {
                book,
                chapter,
                verse,
            } => range_reference(book.name, chapter, verse, verse),
            FetchRequest::Range {
                book,
                chapter,
                lo,
                hi,
            } => range_reference(book.name, chapter, lo, hi),
        }
    }

    pub fn run<L: VerseLookup + ?Sized>(&self, lookup: &L, version: &str) -> Fetched {
        match *self {
            FetchRequest::Verse {
                book,
                chapter,
                verse,
            } => lookup::fetch_verse(lookup, version, &book, chapter, verse),
            FetchRequest::Range {
                book,
                chapter,
                lo,
                hi,
            } => lookup::fetch_range(lookup, version, &book, chapter, lo, hi),
        }
    }

    fn missing_text(&self) -> &'static str {
        match self {
            FetchRequest::Verse { .. } => VERSE_MISSING_TEXT,
            FetchRequest::Range { .. } => RANGE_MISSING_TEXT,
        }
    }

    fn error_text(&self) -> &'static str {
        match self {
            FetchRequest::Verse { .. } => VERSE_ERROR_TEXT,
            FetchRequest::Range { .. } => RANGE_ERROR_TEXT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    book: Option<Book>,
    chapter: Option<u32>,
    verse: Option<u32>,
    range_start: Option<u32>,
    range_end: Option<u32>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(&self) -> Option<Book> {
        self.book
    }

    pub fn chapter(&self) -> Option<u32> {
        self.chapter
    }

    pub fn verse(&self) -> Option<u32> {
        self.verse
    }

    pub fn range_start(&self) -> Option<u32> {
        self.range_start
    }

    pub fn range_end(&self) -> Option<u32> {
        self.range_end
    }

    pub fn phase(&self) -> Phase {
        match (self.book, self.chapter, self.range_start, self.range_end) {
            (None, _, _, _) => Phase::Idle,
            (Some(_), None, _, _) => Phase::BookChosen,
            (Some(_), Some(_), None, _) => Phase::ChapterChosen,
            (Some(_), Some(_), Some(_), None) => Phase::VerseChosen,
            (Some(_), Some(_), Some(_), Some(_)) => Phase::RangeChosen,
        }
    }

    /// The completed range, if a shift-extend happened since the last plain choice.
    pub fn active_range(&self) -> Option<(u32, u32)> {
        match (self.range_start, self.range_end) {
            (Some(lo), Some(hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    pub fn range_contains(&self, verse: u32) -> bool {
        self.active_range()
            .map(|(lo, hi)| (lo..=hi).contains(&verse))
            .unwrap_or(false)
    }

    /// Location of the selected verse, when one is selected.
    pub fn location(&self) -> Option<VerseRef> {
        let book = self.book?;
        VerseRef::new(book.name, self.chapter?, self.verse?).ok()
    }

    pub fn select_book(self, book: Book) -> (Self, Option<FetchRequest>) {
        tracing::debug!(book = book.name, "book selected");
        (
            Self {
                book: Some(book),
                ..Self::default()
            },
            None,
        )
    }

    pub fn select_chapter(self, chapter: u32) -> (Self, Option<FetchRequest>) {
        let book = match self.book {
            Some(book) if (1..=book.chapters()).contains(&chapter) => book,
            _ => {
                tracing::debug!(chapter, "chapter ignored");
                return (self, None);
            }
        };
        (
            Self {
                book: Some(book),
                chapter: Some(chapter),
                ..Self::default()
            },
            None,
        )
    }

    pub fn select_verse(self, verse: u32, modifiers: Modifiers) -> (Self, Option<FetchRequest>) {
        let (book, chapter) = match (self.book, self.chapter) {
            (Some(book), Some(chapter)) if book.has_verse(chapter, verse) => (book, chapter),
            _ => {
                tracing::debug!(verse, "verse ignored");
                return (self, None);
            }
        };

        if let (true, Some(anchor)) = (modifiers.shift, self.range_start) {
            let lo = anchor.min(verse);
            let hi = anchor.max(verse);
            let next = Self {
                verse: Some(verse),
                range_start: Some(lo),
                range_end: Some(hi),
                ..self
            };
            return (
                next,
                Some(FetchRequest::Range {
                    book,
                    chapter,
                    lo,
                    hi,
                }),
            );
        }

        let next = Self {
            verse: Some(verse),
            range_start: Some(verse),
            range_end: None,
            ..self
        };
        (
            next,
            Some(FetchRequest::Verse {
                book,
                chapter,
                verse,
            }),
        )
    }

    /// Fetch for the current selection, used after a version change.
    pub fn refetch(&self) -> Option<FetchRequest> {
        let book = self.book?;
        let chapter = self.chapter?;
        match (self.range_start, self.range_end) {
            (Some(lo), Some(hi)) => Some(FetchRequest::Range {
                book,
                chapter,
                lo,
                hi,
            }),
            _ => self.verse.map(|verse| FetchRequest::Verse {
                book,
                chapter,
                verse,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// The last fetched text, including placeholders, as shown on the control surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentText {
    pub text: String,
    pub reference: String,
    pub placeholder: bool,
}

/// Staged preview items plus the text of the last completed fetch.
#[derive(Debug, Clone, Default)]
pub struct PreviewSlot {
    generation: u64,
    staged: Vec<ProjectableItem>,
    current: Option<CurrentText>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch. Any ticket handed out earlier becomes stale.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Store the outcome of a fetch. Returns false when the ticket is stale.
    pub fn complete(&mut self, ticket: FetchTicket, request: &FetchRequest, fetched: Fetched) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                reference = %request.reference(),
                "dropping stale fetch result"
            );
            return false;
        }

        match fetched {
            Fetched::Item(item) => {
                self.current = Some(CurrentText {
                    text: item.text.clone(),
                    reference: item.reference.clone(),
                    placeholder: false,
                });
                self.staged = vec![ProjectableItem::Scripture(item)];
            }
            Fetched::Missing => self.degrade(request, request.missing_text()),
            Fetched::Failed(_) => self.degrade(request, request.error_text()),
        }
        true
    }

    fn degrade(&mut self, request: &FetchRequest, text: &str) {
        self.staged.clear();
        self.current = Some(CurrentText {
            text: text.to_string(),
            reference: request.reference(),
            placeholder: true,
        });
    }

    /// Forget everything and make in-flight tickets stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.staged.clear();
        self.current = None;
    }

    pub fn stage(&mut self, item: ProjectableItem) {
        self.staged = vec![item];
    }

    /// Drop staged items but keep the current text.
    pub fn unstage(&mut self) {
        self.staged.clear();
    }

    pub fn staged(&self) -> &[ProjectableItem] {
        &self.staged
    }

    pub fn current(&self) -> Option<&CurrentText> {
        self.current.as_ref()
    }

    /// The staged scripture item, when the preview holds fetched text.
    pub fn scripture(&self) -> Option<&ScriptureItem> {
        self.staged.iter().find_map(|item| match item {
            ProjectableItem::Scripture(s) => Some(s),
            ProjectableItem::Note(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_book;
    use crate::lookup::memory::MemLookup;
    use proptest::prelude::*;

    fn john() -> Book {
        find_book("John").unwrap()
    }

    fn at_chapter(chapter: u32) -> SelectionState {
        let (s, _) = SelectionState::new().select_book(john());
        let (s, _) = s.select_chapter(chapter);
        s
    }

    #[test]
    fn phases_follow_choices() {
        let s = SelectionState::new();
        assert_eq!(s.phase(), Phase::Idle);
        let (s, _) = s.select_book(john());
        assert_eq!(s.phase(), Phase::BookChosen);
        let (s, _) = s.select_chapter(3);
        assert_eq!(s.phase(), Phase::ChapterChosen);
        let (s, _) = s.select_verse(16, Modifiers::NONE);
        assert_eq!(s.phase(), Phase::VerseChosen);
        let (s, _) = s.select_verse(18, Modifiers::SHIFT);
        assert_eq!(s.phase(), Phase::RangeChosen);
        let (s, _) = s.select_verse(5, Modifiers::NONE);
        assert_eq!(s.phase(), Phase::VerseChosen);
    }

    #[test]
    fn changing_book_clears_everything_below() {
        let (s, _) = at_chapter(3).select_verse(16, Modifiers::NONE);
        let (s, _) = s.select_verse(18, Modifiers::SHIFT);
        let (s, fetch) = s.select_book(find_book("Genesis").unwrap());
        assert!(fetch.is_none());
        assert_eq!(s.book().unwrap().name, "Genesis");
        assert_eq!(s.chapter(), None);
        assert_eq!(s.verse(), None);
        assert_eq!(s.active_range(), None);
    }

    #[test]
    fn chapter_guards() {
        let (s, fetch) = SelectionState::new().select_chapter(3);
        assert_eq!(s, SelectionState::new());
        assert!(fetch.is_none());

        let past_end = at_chapter(3).select_chapter(22).0;
        assert_eq!(past_end.chapter(), Some(3));
        let zero = at_chapter(3).select_chapter(0).0;
        assert_eq!(zero.chapter(), Some(3));
    }

    #[test]
    fn verse_guards() {
        let (s, _) = SelectionState::new().select_book(john());
        let (after, fetch) = s.clone().select_verse(16, Modifiers::NONE);
        assert_eq!(after, s);
        assert!(fetch.is_none());

        let (after, fetch) = at_chapter(3).select_verse(0, Modifiers::NONE);
        assert_eq!(after, at_chapter(3));
        assert!(fetch.is_none());

        // John 3 ends at verse 36
        let (after, fetch) = at_chapter(3).select_verse(37, Modifiers::NONE);
        assert_eq!(after, at_chapter(3));
        assert!(fetch.is_none());
    }

    #[test]
    fn shift_past_chapter_end_keeps_selection() {
        let (s, _) = at_chapter(3).select_verse(16, Modifiers::NONE);
        let (after, fetch) = s.clone().select_verse(200_000, Modifiers::SHIFT);
        assert_eq!(after, s);
        assert!(fetch.is_none());

        let (last, fetch) = s.select_verse(36, Modifiers::SHIFT);
        assert_eq!(last.active_range(), Some((16, 36)));
        assert_eq!(fetch.unwrap().reference(), "John 3:16-36");
    }

    #[test]
    fn plain_choice_requests_one_verse() {
        let (s, fetch) = at_chapter(3).select_verse(16, Modifiers::NONE);
        assert_eq!(s.range_start(), Some(16));
        assert_eq!(s.range_end(), None);
        assert_eq!(
            fetch,
            Some(FetchRequest::Verse {
                book: john(),
                chapter: 3,
                verse: 16
            })
        );
    }

    #[test]
    fn shift_without_anchor_is_plain() {
        let (s, fetch) = at_chapter(3).select_verse(16, Modifiers::SHIFT);
        assert_eq!(s.active_range(), None);
        assert!(matches!(fetch, Some(FetchRequest::Verse { verse: 16, .. })));
    }

    #[test]
    fn shift_extends_from_anchor() {
        let (s, _) = at_chapter(3).select_verse(16, Modifiers::NONE);
        let (s, fetch) = s.select_verse(18, Modifiers::SHIFT);
        assert_eq!(s.active_range(), Some((16, 18)));
        assert_eq!(fetch.unwrap().reference(), "John 3:16-18");
        assert!(s.range_contains(17));
        assert!(!s.range_contains(19));
    }

    #[test]
    fn shift_on_anchor_itself_is_one_verse_range() {
        let (s, _) = at_chapter(3).select_verse(16, Modifiers::NONE);
        let (s, fetch) = s.select_verse(16, Modifiers::SHIFT);
        assert_eq!(s.active_range(), Some((16, 16)));
        assert_eq!(fetch.unwrap().reference(), "John 3:16");
    }

    #[test]
    fn refetch_prefers_range() {
        let (s, _) = at_chapter(3).select_verse(16, Modifiers::NONE);
        assert!(matches!(s.refetch(), Some(FetchRequest::Verse { verse: 16, .. })));
        let (s, _) = s.select_verse(14, Modifiers::SHIFT);
        assert!(matches!(
            s.refetch(),
            Some(FetchRequest::Range { lo: 14, hi: 16, .. })
        ));
        assert_eq!(at_chapter(3).refetch(), None);
    }

    proptest! {
        #[test]
        fn range_is_direction_independent(a in 1u32..=36, b in 1u32..=36) {
            let (up, _) = at_chapter(3).select_verse(a, Modifiers::NONE);
            let (up, up_fetch) = up.select_verse(b, Modifiers::SHIFT);
            let (down, _) = at_chapter(3).select_verse(b, Modifiers::NONE);
            let (down, down_fetch) = down.select_verse(a, Modifiers::SHIFT);

            prop_assert_eq!(up.active_range(), down.active_range());
            prop_assert_eq!(up_fetch, down_fetch);
            prop_assert_eq!(up.active_range(), Some((a.min(b), a.max(b))));
        }
    }

    fn verse_request(verse: u32) -> FetchRequest {
        FetchRequest::Verse {
            book: john(),
            chapter: 3,
            verse,
        }
    }

    #[test]
    fn stale_ticket_does_not_overwrite_newer_preview() {
        let lookup = MemLookup::new()
            .with_verse("KJV", 43, 3, 16, "For God so loved the world")
            .with_verse("KJV", 43, 3, 17, "For God sent not his Son");
        let mut slot = PreviewSlot::new();

        let first = slot.begin();
        let second = slot.begin();
        assert!(slot.complete(second, &verse_request(17), verse_request(17).run(&lookup, "KJV")));
        assert!(!slot.complete(first, &verse_request(16), verse_request(16).run(&lookup, "KJV")));

        assert_eq!(slot.current().unwrap().reference, "John 3:17");
        assert_eq!(slot.scripture().unwrap().id, "John-3-17");
    }

    #[test]
    fn failures_become_placeholders_and_clear_staged() {
        let ok = MemLookup::new().with_verse("KJV", 43, 3, 16, "For God so loved the world");
        let mut slot = PreviewSlot::new();
        let ticket = slot.begin();
        slot.complete(ticket, &verse_request(16), verse_request(16).run(&ok, "KJV"));
        assert_eq!(slot.staged().len(), 1);

        let ticket = slot.begin();
        slot.complete(ticket, &verse_request(16), Fetched::Failed("offline".into()));
        let current = slot.current().unwrap();
        assert_eq!(current.text, VERSE_ERROR_TEXT);
        assert_eq!(current.reference, "John 3:16");
        assert!(current.placeholder);
        assert!(slot.staged().is_empty());

        let range = FetchRequest::Range {
            book: john(),
            chapter: 3,
            lo: 40,
            hi: 41,
        };
        let ticket = slot.begin();
        slot.complete(ticket, &range, Fetched::Missing);
        assert_eq!(slot.current().unwrap().text, RANGE_MISSING_TEXT);
        assert_eq!(slot.current().unwrap().reference, "John 3:40-41");
    }

    #[test]
    fn invalidate_makes_in_flight_tickets_stale() {
        let mut slot = PreviewSlot::new();
        let ticket = slot.begin();
        slot.invalidate();
        assert!(!slot.complete(ticket, &verse_request(16), Fetched::Missing));
        assert!(slot.current().is_none());
    }
}
