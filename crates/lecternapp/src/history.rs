//! # Projection History
//!
//! A bounded log of what went live, newest first. Entries are deduplicated on
//! `(text, reference)`: recording something already in the log moves it to the top
//! with a fresh id and timestamp instead of adding a second copy.
//!
//! The whole list is persisted under [`StoreKey::History`] after every change. The
//! in-memory list only changes once that write succeeds.
//!
//! A malformed stored list is treated as empty at load time. A malformed value seen on
//! [`HistoryStore::reload`] is ignored and the in-memory list kept.

use crate::error::Result;
use crate::model::{HistoryItem, ItemKind, ProjectableItem, DEFAULT_NOTE_REFERENCE};
use crate::store::{read_json, StorageBackend, StoreKey, Stored};

pub const HISTORY_LIMIT: usize = 50;

pub struct HistoryStore<B: StorageBackend> {
    backend: B,
    entries: Vec<HistoryItem>,
}

impl<B: StorageBackend> HistoryStore<B> {
    pub fn load(backend: B) -> Result<Self> {
        let mut entries = match read_json::<_, Vec<HistoryItem>>(&backend, StoreKey::History)? {
            Stored::Value(entries) => entries,
            Stored::Missing => Vec::new(),
            Stored::Corrupt(e) => {
                tracing::warn!(error = %e, "ignoring malformed history");
                Vec::new()
            }
        };
        entries.truncate(HISTORY_LIMIT);
        Ok(Self { backend, entries })
    }

    /// Re-read the stored list. Returns false when the stored value was unusable.
    pub fn reload(&mut self) -> Result<bool> {
        match read_json::<_, Vec<HistoryItem>>(&self.backend, StoreKey::History)? {
            Stored::Value(mut entries) => {
                entries.truncate(HISTORY_LIMIT);
                self.entries = entries;
                Ok(true)
            }
            Stored::Missing => {
                self.entries.clear();
                Ok(true)
            }
            Stored::Corrupt(e) => {
                tracing::warn!(error = %e, "keeping in-memory history over malformed value");
                Ok(false)
            }
        }
    }

    pub fn record(&mut self, text: &str, reference: &str, kind: ItemKind) -> Result<&HistoryItem> {
        let mut next = Vec::with_capacity(HISTORY_LIMIT);
        next.push(HistoryItem::new(text, reference, kind));
        next.extend(
            self.entries
                .iter()
                .filter(|entry| !entry.same_entry(text, reference))
                .cloned(),
        );
        next.truncate(HISTORY_LIMIT);

        self.persist(&next)?;
        self.entries = next;
        tracing::debug!(reference, entries = self.entries.len(), "history recorded");
        Ok(&self.entries[0])
    }

    /// Record a live item. A note without text is remembered by its title, and a note
    /// without a title under [`DEFAULT_NOTE_REFERENCE`].
    pub fn record_item(&mut self, item: &ProjectableItem) -> Result<&HistoryItem> {
        match item {
            ProjectableItem::Note(note) => {
                let text = if note.text.is_empty() {
                    note.reference.clone()
                } else {
                    note.text.clone()
                };
                let reference = if note.reference.is_empty() {
                    DEFAULT_NOTE_REFERENCE
                } else {
                    note.reference.as_str()
                };
                self.record(&text, reference, ItemKind::Note)
            }
            ProjectableItem::Scripture(s) => self.record(&s.text, &s.reference, ItemKind::Scripture),
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.persist(&[])?;
        self.entries.clear();
        Ok(())
    }

    pub fn list(&self) -> &[HistoryItem] {
        &self.entries
    }

    /// 1-based lookup, matching the numbering shown to the operator.
    pub fn get(&self, position: usize) -> Option<&HistoryItem> {
        position.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self, entries: &[HistoryItem]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.backend.write(StoreKey::History, &json)
    }
}
