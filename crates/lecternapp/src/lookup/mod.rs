//! # Verse Lookup
//!
//! Verse text comes from an external service keyed by
//! `(version, book id, chapter, verse)`. [`VerseLookup`] is the seam; everything above
//! it works on [`Fetched`] values and never sees transport errors.
//!
//! ## Failure Model
//!
//! Lookups fail in two ways, and neither is fatal:
//! - **Not found**: the service answered without text → [`Fetched::Missing`].
//! - **Error**: network, HTTP or decoding failure → [`Fetched::Failed`].
//!
//! The caller turns both into a placeholder preview.
//!
//! ## Markers
//!
//! Raw text may embed Strong's numbers (`<S>430</S>`) and numeric `<sup>` markers.
//! [`strip_markers`] removes them. Ranges then re-add exactly one leading
//! [`verse_marker`] per verse so the audience can follow along.
//!
//! ## Implementations
//!
//! - [`http::HttpLookup`]: blocking HTTP client for the public lookup service.
//! - [`memory::MemLookup`]: fixed table with failure injection, for tests and demos.

use crate::catalog::Book;
use crate::error::Result;
use crate::model::{range_id, range_reference, ScriptureItem, VerseRef};
use once_cell::sync::Lazy;
use regex::Regex;

pub mod http;
pub mod memory;

pub trait VerseLookup {
    /// Fetch the raw text of one verse. Returns Ok(None) when the verse does not exist.
    fn fetch(&self, version: &str, book_id: u8, chapter: u32, verse: u32)
        -> Result<Option<String>>;
}

impl<L: VerseLookup + ?Sized> VerseLookup for Box<L> {
    fn fetch(
        &self,
        version: &str,
        book_id: u8,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<String>> {
        (**self).fetch(version, book_id, chapter, verse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Item(ScriptureItem),
    Missing,
    Failed(String),
}

static STRONGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<S>\s*\d+\s*</S>").expect("valid strongs pattern"));
static NUMERIC_SUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<sup>\s*\d+\s*</sup>").expect("valid sup pattern"));
static SPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("valid whitespace pattern"));

/// Remove inline numeric markers and tidy the whitespace they leave behind.
pub fn strip_markers(raw: &str) -> String {
    let text = STRONGS.replace_all(raw, "");
    let text = NUMERIC_SUP.replace_all(&text, "");
    SPACE_RUNS.replace_all(&text, " ").trim().to_string()
}

/// Leading marker placed before each verse of a combined range.
pub fn verse_marker(verse: u32) -> String {
    format!("<sup class=\"verse-number\">{}</sup>", verse)
}

pub fn fetch_verse<L: VerseLookup + ?Sized>(
    lookup: &L,
    version: &str,
    book: &Book,
    chapter: u32,
    verse: u32,
) -> Fetched {
    let location = match VerseRef::new(book.name, chapter, verse) {
        Ok(location) => location,
        Err(e) => return Fetched::Failed(e.to_string()),
    };

    match lookup.fetch(version, book.id, chapter, verse) {
        Ok(Some(raw)) => {
            let text = strip_markers(&raw);
            if text.is_empty() {
                Fetched::Missing
            } else {
                Fetched::Item(ScriptureItem::verse(location, text, version))
            }
        }
        Ok(None) => Fetched::Missing,
        Err(e) => {
            tracing::warn!(%location, error = %e, "verse lookup failed");
            Fetched::Failed(e.to_string())
        }
    }
}

/// Fetch `lo..=hi` one verse at a time and combine them into a single item.
///
/// Verses the service does not know are skipped; any transport error fails the whole
/// range. The combined item is located at `lo`.
pub fn fetch_range<L: VerseLookup + ?Sized>(
    lookup: &L,
    version: &str,
    book: &Book,
    chapter: u32,
    lo: u32,
    hi: u32,
) -> Fetched {
    let location = match VerseRef::new(book.name, chapter, lo) {
        Ok(location) => location,
        Err(e) => return Fetched::Failed(e.to_string()),
    };

    let mut texts = Vec::new();
    for verse in lo..=hi {
        match lookup.fetch(version, book.id, chapter, verse) {
            Ok(Some(raw)) => {
                let text = strip_markers(&raw);
                if !text.is_empty() {
                    texts.push(format!("{}{}", verse_marker(verse), text));
                }
            }
            Ok(None) => {
                tracing::debug!(book = book.name, chapter, verse, "verse missing from range");
            }
            Err(e) => {
                tracing::warn!(book = book.name, chapter, lo, hi, error = %e, "range lookup failed");
                return Fetched::Failed(e.to_string());
            }
        }
    }

    if texts.is_empty() {
        return Fetched::Missing;
    }

    Fetched::Item(ScriptureItem {
        id: range_id(book.name, chapter, lo, hi),
        location: Some(location),
        text: texts.join(" "),
        reference: range_reference(book.name, chapter, lo, hi),
        version: Some(version.to_string()),
    })
}
