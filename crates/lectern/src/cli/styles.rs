//! Terminal styles for the lectern CLI.
//!
//! Renderers refer to styles by meaning (a reference, a time, a warning), never by
//! color. Changing the palette happens here only. All styles are built once through
//! `once_cell::sync::Lazy`; `console` drops the escape codes on its own when stdout is
//! not a terminal.

use console::Style;
use once_cell::sync::Lazy;

pub static REGULAR: Lazy<Style> = Lazy::new(Style::new);
pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().color256(250));
pub static FAINT: Lazy<Style> = Lazy::new(|| Style::new().color256(242));
pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static TIME: Lazy<Style> = Lazy::new(|| MUTED.clone().italic());

pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow().bold());
pub static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red().bold());
pub static INFO: Lazy<Style> = Lazy::new(|| MUTED.clone());

// Lists
pub static LIST_INDEX: Lazy<Style> = Lazy::new(|| Style::new().color256(220));
pub static REFERENCE: Lazy<Style> = Lazy::new(|| Style::new().cyan());
pub static NOTE_MARKER: Lazy<Style> = Lazy::new(|| Style::new().magenta());

// Slides
pub static HEADING: Lazy<Style> = Lazy::new(|| Style::new().bold().underlined());
pub static CITATION: Lazy<Style> = Lazy::new(|| Style::new().cyan().italic());
pub static WAITING: Lazy<Style> = Lazy::new(|| FAINT.clone().italic());
pub static PLACEHOLDER: Lazy<Style> = Lazy::new(|| Style::new().red());
