//! # CLI Behavior
//!
//! This is **one possible UI client** for lectern, not the application itself.
//!
//! ## Naked Execution (`lectern`)
//!
//! Running `lectern` with no arguments starts the control panel REPL, the surface an
//! operator spends the service in. Everything else is a one-shot subcommand:
//!
//! - `lectern slideshow`: follow the live snapshot and draw it in this terminal
//! - `lectern show`: print the live snapshot once
//! - `lectern history [list|clear|replay N]`
//! - `lectern books [query]`
//! - `lectern config`
//!
//! All of them operate on the same data directory, so a slideshow started in a second
//! terminal (or through `open`) follows whatever the control panel publishes.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, dispatch, the REPL loop and the slideshow loop
//! - `repl`: Parsing of REPL lines
//! - `render`: Output formatting (lists, slides, messages)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling
//! - `logging`: `tracing-subscriber` installation
//! - `editor`: `$EDITOR` integration for notes
//! - `launcher`: Spawning a slideshow process

mod commands;
mod editor;
mod launcher;
mod logging;
mod render;
mod repl;
pub mod setup;
mod styles;

pub use commands::run;
