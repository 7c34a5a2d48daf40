//! # Storage Layer
//!
//! Surfaces never talk to each other directly. Everything they share lives in a small
//! key/value store, abstracted by [`backend::StorageBackend`]:
//!
//! ```text
//! <data dir>/
//! ├── snapshot.json       # The live snapshot (whole-document replace)
//! ├── background-color    # Override merged by the slideshow on every read
//! ├── background-image    # Override; absent file means "no image"
//! ├── history.json        # Projection history, newest first, max 50
//! ├── version             # Preferred translation
//! ├── dark-mode           # Dark-mode preference
//! └── lectern.toml        # Configuration (read by `config`, never written here)
//! ```
//!
//! ## Ownership
//!
//! The snapshot and both override keys are written only by the control surface. The
//! slideshow is strictly a reader. Writes replace the whole value; there is no merge
//! and no locking, so concurrent writers resolve as last-write-wins.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: One file per key with atomic temp-file + rename writes.
//!   Works across processes.
//! - [`mem_backend::MemBackend`]: Shared in-memory map for tests and for running both
//!   surfaces inside one process.
//!
//! Reading a typed value goes through [`read_json`], which separates "missing" from
//! "present but unreadable" so callers can keep their last good state on corruption.

use crate::error::Result;
use serde::de::DeserializeOwned;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::{StorageBackend, StoreKey};

/// Outcome of reading and parsing one JSON value.
#[derive(Debug)]
pub enum Stored<T> {
    Missing,
    Corrupt(serde_json::Error),
    Value(T),
}

impl<T> Stored<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Stored::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Read and parse a JSON value. I/O failures are errors; parse failures are reported
/// as [`Stored::Corrupt`] so the caller decides whether to swallow them.
pub fn read_json<B: StorageBackend, T: DeserializeOwned>(
    backend: &B,
    key: StoreKey,
) -> Result<Stored<T>> {
    let raw = match backend.read(key)? {
        Some(raw) => raw,
        None => return Ok(Stored::Missing),
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Stored::Value(value)),
        Err(e) => Ok(Stored::Corrupt(e)),
    }
}

/// Read a plain string value, treating blank content as missing.
pub fn read_text<B: StorageBackend>(backend: &B, key: StoreKey) -> Result<Option<String>> {
    Ok(backend
        .read(key)?
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}
