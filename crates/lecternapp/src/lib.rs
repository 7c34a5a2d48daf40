//! # lecternapp
//!
//! The UI-agnostic core of lectern: browse books, chapters and verses, stage a passage
//! or a note, and project it onto a second display surface that follows along in near
//! real time.
//!
//! ## Architecture
//!
//! ```text
//! UI (CLI REPL, slideshow)
//!   └── api::PresenterApi          facade, input normalization
//!         └── commands/*           control-surface logic, CmdResult
//!               ├── selection      state machine + preview slot
//!               ├── publish        snapshot writes + notices
//!               ├── history        bounded, deduplicated log
//!               └── lookup         verse text (HTTP / in-memory)
//!
//! subscriber::SubscriberSync       consumer surface: read, merge, render
//! store::StorageBackend            shared key/value state (fs / memory)
//! channel::NotifyBus               in-process push notifications
//! ```
//!
//! The control surface is the only writer of the snapshot and background keys. The
//! slideshow only reads. They share nothing but the storage backend (and, within one
//! process, the notify bus).

pub mod api;
pub mod catalog;
pub mod channel;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod init;
pub mod lookup;
pub mod model;
pub mod publish;
pub mod render;
pub mod selection;
pub mod store;
pub mod subscriber;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
