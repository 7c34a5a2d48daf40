use super::VerseLookup;
use crate::error::{LecternError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

type VerseKey = (String, u8, u32, u32);

/// Fixed-table lookup.
///
/// Records the verse number of every request so tests can assert on the request
/// pattern. Uses `RefCell` since a control surface is single-threaded.
#[derive(Default)]
pub struct MemLookup {
    verses: HashMap<VerseKey, String>,
    fail: bool,
    requests: RefCell<Vec<u32>>,
}

impl MemLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verse(
        mut self,
        version: &str,
        book_id: u8,
        chapter: u32,
        verse: u32,
        text: &str,
    ) -> Self {
        self.insert(version, book_id, chapter, verse, text);
        self
    }

    pub fn insert(&mut self, version: &str, book_id: u8, chapter: u32, verse: u32, text: &str) {
        self.verses.insert(
            (version.to_uppercase(), book_id, chapter, verse),
            text.to_string(),
        );
    }

    /// Every subsequent request fails as if the service were unreachable.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn set_failing(&mut self, fail: bool) {
        self.fail = fail;
    }

    pub fn requests(&self) -> Vec<u32> {
        self.requests.borrow().clone()
    }
}

impl VerseLookup for MemLookup {
    fn fetch(
        &self,
        version: &str,
        book_id: u8,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<String>> {
        self.requests.borrow_mut().push(verse);
        if self.fail {
            return Err(LecternError::Lookup("Simulated lookup failure".to_string()));
        }
        Ok(self
            .verses
            .get(&(version.to_uppercase(), book_id, chapter, verse))
            .cloned())
    }
}
