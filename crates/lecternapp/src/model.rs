//! # Domain Model: Items, Snapshots and History
//!
//! This module defines what travels between the control surface and the slideshow:
//! [`ProjectableItem`], [`Snapshot`] and [`HistoryItem`].
//!
//! ## Items
//!
//! Two kinds of content can be projected:
//!
//! - **Scripture**: text fetched from the lookup service. The text is a plain or HTML
//!   fragment (ranges carry a `<sup>` verse marker per verse) and is rendered verbatim.
//! - **Note**: operator-authored markdown, rendered through a sanitizing markdown pass.
//!
//! Items are an explicit tagged union, serialized with a `kind` field:
//!
//! ```text
//! {"kind":"scripture","id":"John-3-16","ref":{"book":"John","chapter":3,"verse":16},
//!  "text":"For God so loved…","reference":"John 3:16","version":"KJV"}
//! {"kind":"note","id":"note-6f0c…","text":"**Welcome**","reference":"Opening"}
//! ```
//!
//! Notes still get a `note-` id prefix and history replays a `history-` prefix, but the
//! tag is what renderers look at.
//!
//! ## Identifiers
//!
//! | Item | Id |
//! |------|----|
//! | Single verse | `{Book}-{chapter}-{verse}` |
//! | Combined range | `{Book}-{chapter}-{lo}-{hi}` |
//! | Note | `note-{uuid}` |
//! | History replay | `history-{uuid}` |
//! | Fallback single item | `single` |
//!
//! Within one snapshot, ids are unique and list order is render order.
//!
//! ## Snapshots
//!
//! A [`Snapshot`] is the unit of publication. It is always replaced whole, never
//! patched. The wire format is camelCase (`fontSize`, `darkMode`, …).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::DEFAULT_VERSION;
use crate::error::{LecternError, Result};

pub const NOTE_ID_PREFIX: &str = "note-";
pub const HISTORY_ID_PREFIX: &str = "history-";
pub const SINGLE_ITEM_ID: &str = "single";
pub const DEFAULT_NOTE_REFERENCE: &str = "Note";

/// A validated `(book, chapter, verse)` location. Chapter and verse are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "VerseRefRepr")]
pub struct VerseRef {
    book: String,
    chapter: u32,
    verse: u32,
}

#[derive(Deserialize)]
struct VerseRefRepr {
    book: String,
    chapter: u32,
    verse: u32,
}

impl TryFrom<VerseRefRepr> for VerseRef {
    type Error = LecternError;

    fn try_from(repr: VerseRefRepr) -> Result<Self> {
        VerseRef::new(repr.book, repr.chapter, repr.verse)
    }
}

impl VerseRef {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Result<Self> {
        let book = book.into();
        if book.trim().is_empty() {
            return Err(LecternError::InvalidInput("book name is empty".into()));
        }
        if chapter == 0 || verse == 0 {
            return Err(LecternError::InvalidInput(format!(
                "{} {}:{} is not a valid location",
                book, chapter, verse
            )));
        }
        Ok(Self {
            book,
            chapter,
            verse,
        })
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse(&self) -> u32 {
        self.verse
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

pub fn scripture_id(book: &str, chapter: u32, verse: u32) -> String {
    format!("{}-{}-{}", book, chapter, verse)
}

pub fn range_id(book: &str, chapter: u32, lo: u32, hi: u32) -> String {
    format!("{}-{}-{}-{}", book, chapter, lo, hi)
}

/// `"Book C:lo-hi"`, collapsing to `"Book C:lo"` for a one-verse range.
pub fn range_reference(book: &str, chapter: u32, lo: u32, hi: u32) -> String {
    if lo == hi {
        format!("{} {}:{}", book, chapter, lo)
    } else {
        format!("{} {}:{}-{}", book, chapter, lo, hi)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    Medium,
    Large,
    #[default]
    ExtraLarge,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
            FontSize::ExtraLarge => "extra-large",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontSize {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" | "s" => Ok(FontSize::Small),
            "medium" | "m" => Ok(FontSize::Medium),
            "large" | "l" => Ok(FontSize::Large),
            "extra-large" | "xl" => Ok(FontSize::ExtraLarge),
            other => Err(LecternError::InvalidInput(format!(
                "unknown font size '{}' (expected small, medium, large or extra-large)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Scripture,
    // Entries written before the kind was recorded were always replayed as notes.
    #[default]
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptureItem {
    pub id: String,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<VerseRef>,
    pub text: String,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ScriptureItem {
    /// A single fetched verse, identified by its location.
    pub fn verse(location: VerseRef, text: impl Into<String>, version: &str) -> Self {
        Self {
            id: scripture_id(location.book(), location.chapter(), location.verse()),
            reference: location.to_string(),
            location: Some(location),
            text: text.into(),
            version: Some(version.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteItem {
    pub id: String,
    pub text: String,
    pub reference: String,
}

impl NoteItem {
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: format!("{}{}", NOTE_ID_PREFIX, Uuid::new_v4()),
            text: text.into(),
            reference: reference.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProjectableItem {
    Scripture(ScriptureItem),
    Note(NoteItem),
}

impl ProjectableItem {
    pub fn id(&self) -> &str {
        match self {
            ProjectableItem::Scripture(s) => &s.id,
            ProjectableItem::Note(n) => &n.id,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ProjectableItem::Scripture(s) => &s.text,
            ProjectableItem::Note(n) => &n.text,
        }
    }

    pub fn reference(&self) -> &str {
        match self {
            ProjectableItem::Scripture(s) => &s.reference,
            ProjectableItem::Note(n) => &n.reference,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ProjectableItem::Scripture(_) => ItemKind::Scripture,
            ProjectableItem::Note(_) => ItemKind::Note,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, ProjectableItem::Note(_))
    }
}

impl From<ScriptureItem> for ProjectableItem {
    fn from(item: ScriptureItem) -> Self {
        ProjectableItem::Scripture(item)
    }
}

impl From<NoteItem> for ProjectableItem {
    fn from(item: NoteItem) -> Self {
        ProjectableItem::Note(item)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub items: Vec<ProjectableItem>,
    pub font_size: FontSize,
    pub dark_mode: bool,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Publish counter stamped by the publish channel; 0 for unsequenced data.
    #[serde(default)]
    pub sequence: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            font_size: FontSize::ExtraLarge,
            dark_mode: true,
            version: DEFAULT_VERSION.to_string(),
            background_color: None,
            background_image: None,
            sequence: 0,
        }
    }
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Display options owned by the control surface and copied into every snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    pub font_size: FontSize,
    pub dark_mode: bool,
    pub version: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            font_size: FontSize::ExtraLarge,
            dark_mode: true,
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl DisplaySettings {
    pub fn snapshot(&self, items: Vec<ProjectableItem>) -> Snapshot {
        Snapshot {
            items,
            font_size: self.font_size,
            dark_mode: self.dark_mode,
            version: self.version.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub text: String,
    pub reference: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub kind: ItemKind,
}

impl HistoryItem {
    pub fn new(text: impl Into<String>, reference: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: format!("{}{}", HISTORY_ID_PREFIX, Uuid::new_v4()),
            text: text.into(),
            reference: reference.into(),
            timestamp: Utc::now(),
            kind,
        }
    }

    /// History entries are deduplicated on `(text, reference)`, never on `id`.
    pub fn same_entry(&self, text: &str, reference: &str) -> bool {
        self.text == text && self.reference == reference
    }

    /// Rebuilds a projectable item. The original location is not kept in history, so
    /// scripture replays carry no `ref`.
    pub fn to_item(&self, version: &str) -> ProjectableItem {
        let id = format!("{}{}", HISTORY_ID_PREFIX, Uuid::new_v4());
        match self.kind {
            ItemKind::Scripture => ProjectableItem::Scripture(ScriptureItem {
                id,
                location: None,
                text: self.text.clone(),
                reference: self.reference.clone(),
                version: Some(version.to_string()),
            }),
            ItemKind::Note => ProjectableItem::Note(NoteItem {
                id,
                text: self.text.clone(),
                reference: self.reference.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verse_ref_rejects_zero_chapter_and_verse() {
        assert!(VerseRef::new("John", 0, 1).is_err());
        assert!(VerseRef::new("John", 3, 0).is_err());
        assert!(VerseRef::new("  ", 3, 16).is_err());
        let r = VerseRef::new("John", 3, 16).unwrap();
        assert_eq!(r.to_string(), "John 3:16");
    }

    #[test]
    fn verse_ref_validates_on_deserialize() {
        let bad: std::result::Result<VerseRef, _> =
            serde_json::from_value(json!({"book": "John", "chapter": 3, "verse": 0}));
        assert!(bad.is_err());
    }

    #[test]
    fn range_reference_collapses_single_verse() {
        assert_eq!(range_reference("John", 3, 16, 18), "John 3:16-18");
        assert_eq!(range_reference("John", 3, 16, 16), "John 3:16");
    }

    #[test]
    fn snapshot_wire_format_is_camel_case_and_tagged() {
        let settings = DisplaySettings {
            font_size: FontSize::ExtraLarge,
            dark_mode: false,
            version: "ESV".into(),
        };
        let location = VerseRef::new("John", 3, 16).unwrap();
        let snapshot = settings.snapshot(vec![
            ScriptureItem::verse(location, "For God so loved", "ESV").into(),
        ]);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["fontSize"], "extra-large");
        assert_eq!(value["darkMode"], false);
        assert_eq!(value["items"][0]["kind"], "scripture");
        assert_eq!(value["items"][0]["id"], "John-3-16");
        assert_eq!(value["items"][0]["ref"]["chapter"], 3);
        assert!(value.get("backgroundImage").is_none());
    }

    #[test]
    fn snapshot_without_sequence_defaults_to_zero() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "items": [{"kind": "note", "id": "note-1", "text": "**Welcome**", "reference": "Opening"}],
            "fontSize": "large",
            "darkMode": true,
            "version": "KJV"
        }))
        .unwrap();
        assert_eq!(snapshot.sequence, 0);
        assert!(snapshot.items[0].is_note());
        assert_eq!(snapshot.font_size, FontSize::Large);
    }

    #[test]
    fn note_ids_carry_reserved_prefix() {
        let note = NoteItem::new("Opening", "Welcome");
        assert!(note.id.starts_with(NOTE_ID_PREFIX));
        assert_ne!(note.id, NoteItem::new("Opening", "Welcome").id);
    }

    #[test]
    fn font_size_parses_short_and_long_names() {
        assert_eq!("xl".parse::<FontSize>().unwrap(), FontSize::ExtraLarge);
        assert_eq!("Medium".parse::<FontSize>().unwrap(), FontSize::Medium);
        assert!("huge".parse::<FontSize>().is_err());
    }

    #[test]
    fn legacy_history_entries_replay_as_notes() {
        let item: HistoryItem = serde_json::from_value(json!({
            "id": "history-1",
            "text": "Grace and peace",
            "reference": "Greeting",
            "timestamp": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(item.kind, ItemKind::Note);
        assert!(item.to_item("KJV").is_note());
    }

    #[test]
    fn scripture_history_replays_without_location() {
        let item = HistoryItem::new("For God so loved", "John 3:16", ItemKind::Scripture);
        match item.to_item("NIV") {
            ProjectableItem::Scripture(s) => {
                assert!(s.location.is_none());
                assert!(s.id.starts_with(HISTORY_ID_PREFIX));
                assert_eq!(s.version.as_deref(), Some("NIV"));
            }
            other => panic!("expected scripture, got {:?}", other),
        }
    }
}
