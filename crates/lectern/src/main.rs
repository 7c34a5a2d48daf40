//! # Lectern CLI
//!
//! The binary is intentionally thin: everything lives in `src/cli/`, and this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/lecternapp/`: UI-agnostic core (selection, publishing, history, sync)
//! - `crates/lectern/`: this CLI, one possible client of that core
//!
//! ## Two Surfaces, One Binary
//!
//! ```text
//! ┌──────────────────────────────┐          ┌──────────────────────────────┐
//! │  lectern control (REPL)      │  writes  │  <data dir>/snapshot.json    │
//! │  PresenterApi<FsBackend, ..> │ ───────► │  background-*, history.json  │
//! └──────────────────────────────┘          └──────────────┬───────────────┘
//!                                                          │ polls
//!                                           ┌──────────────▼───────────────┐
//!                                           │  lectern slideshow           │
//!                                           │  SubscriberSync<FsBackend>   │
//!                                           └──────────────────────────────┘
//! ```
//!
//! The control surface is the only writer. `open` inside the REPL starts a slideshow in
//! a separate process pointed at the same data directory.
//!
//! ## Testing Approach
//!
//! - **Commands layer (`lecternapp::commands`)**: unit tests of the control logic.
//! - **REPL parsing (`cli::repl`)**: unit tests over input lines.
//! - **End to end (`tests/`)**: `assert_cmd` runs against a temporary `LECTERN_DATA`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
