//! # Rendering
//!
//! Everything here returns a `String`; the callers decide where it goes. Layout math
//! (widths, truncation, alignment) is done with `unicode-width` so book names and note
//! text in any script line up.

use super::styles;
use chrono::{DateTime, Utc};
use lecternapp::catalog::Book;
use lecternapp::commands::{BookMatches, CmdMessage, ControlState, MessageLevel};
use lecternapp::config::LecternConfig;
use lecternapp::model::{HistoryItem, ItemKind, ProjectableItem};
use lecternapp::render::{plain_text, RenderedItem, Slide, WAITING_TEXT};
use lecternapp::selection::Phase;
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 16;
const REFERENCE_WIDTH: usize = 24;
const NOTE_MARKER: &str = "✎";

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

/// One line of plain text for list previews.
fn one_line(fragment: &str) -> String {
    plain_text(fragment)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let style = match message.level {
            MessageLevel::Info => &*styles::INFO,
            MessageLevel::Success => &*styles::SUCCESS,
            MessageLevel::Warning => &*styles::WARNING,
            MessageLevel::Error => &*styles::ERROR,
        };
        let _ = writeln!(out, "{}", style.apply_to(&message.content));
    }
    out
}

pub fn render_history(items: &[HistoryItem], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let index_width = items.len().to_string().len() + 1;
    for (i, item) in items.iter().enumerate() {
        let index = pad_to_width(&format!("{}.", i + 1), index_width);
        let marker = match item.kind {
            ItemKind::Note => NOTE_MARKER,
            ItemKind::Scripture => " ",
        };
        let reference = pad_to_width(
            &truncate_to_width(&item.reference, REFERENCE_WIDTH),
            REFERENCE_WIDTH,
        );
        let time = format_time_ago(item.timestamp, now);
        let preview_width = LINE_WIDTH
            .saturating_sub(index_width + 2 + REFERENCE_WIDTH + 1 + TIME_WIDTH + 1);
        let preview = pad_to_width(
            &truncate_to_width(&one_line(&item.text), preview_width),
            preview_width,
        );
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            styles::LIST_INDEX.apply_to(index),
            styles::NOTE_MARKER.apply_to(marker),
            styles::REFERENCE.apply_to(reference),
            styles::REGULAR.apply_to(preview),
            styles::TIME.apply_to(format!("{:>width$}", time, width = TIME_WIDTH)),
        );
    }
    out
}

fn item_line(position: usize, item: &ProjectableItem) -> String {
    let marker = if item.is_note() { NOTE_MARKER } else { " " };
    let reference = if item.reference().trim().is_empty() {
        "(untitled)".to_string()
    } else {
        item.reference().to_string()
    };
    let budget = LINE_WIDTH.saturating_sub(REFERENCE_WIDTH + 8);
    format!(
        "{} {} {} {}",
        styles::LIST_INDEX.apply_to(format!("{:>3}.", position)),
        styles::NOTE_MARKER.apply_to(marker),
        styles::REFERENCE.apply_to(pad_to_width(
            &truncate_to_width(&reference, REFERENCE_WIDTH),
            REFERENCE_WIDTH
        )),
        styles::MUTED.apply_to(truncate_to_width(&one_line(item.text()), budget)),
    )
}

pub fn render_queue(items: &[ProjectableItem]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{}", item_line(i + 1, item));
    }
    out
}

fn book_columns(books: &[Book]) -> String {
    let mut out = String::new();
    let width = books.iter().map(|b| b.name.width()).max().unwrap_or(0) + 2;
    let per_line = (LINE_WIDTH / (width + 5)).max(1);
    for row in books.chunks(per_line) {
        let line: Vec<String> = row
            .iter()
            .map(|b| {
                format!(
                    "{}{}",
                    pad_to_width(b.name, width),
                    styles::FAINT.apply_to(format!("{:>3} ", b.chapters()))
                )
            })
            .collect();
        let _ = writeln!(out, "  {}", line.join(" ").trim_end());
    }
    out
}

pub fn render_books(matches: &BookMatches) -> String {
    let mut out = String::new();
    for (title, books) in [("Old Testament", &matches.old), ("New Testament", &matches.new)] {
        if books.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", styles::TITLE.apply_to(title));
        out.push_str(&book_columns(books));
    }
    out
}

/// Render a slide for a terminal `width` columns wide.
pub fn render_slide(slide: &Slide, width: usize) -> String {
    let mut out = String::new();
    let rule = "─".repeat(width.min(LINE_WIDTH));
    let _ = writeln!(out, "{}", styles::FAINT.apply_to(&rule));
    let _ = writeln!(
        out,
        "{}  {}",
        styles::TITLE.apply_to(&slide.title),
        styles::FAINT.apply_to(format!(
            "[{} | {}{}]",
            slide.font_size,
            slide.background,
            slide
                .background_image
                .as_deref()
                .map(|url| format!(" | {}", url))
                .unwrap_or_default()
        ))
    );
    let _ = writeln!(out, "{}", styles::FAINT.apply_to(&rule));

    if slide.is_waiting() {
        let _ = writeln!(out, "\n{}\n", styles::WAITING.apply_to(WAITING_TEXT));
        return out;
    }

    for item in &slide.items {
        out.push('\n');
        match item {
            RenderedItem::Note { heading, html } => {
                if let Some(heading) = heading {
                    let _ = writeln!(out, "{}", styles::HEADING.apply_to(heading));
                    out.push('\n');
                }
                let _ = writeln!(out, "{}", plain_text(html));
            }
            RenderedItem::Scripture { html, citation } => {
                let _ = writeln!(out, "{}", plain_text(html));
                if let Some(citation) = citation {
                    let _ = writeln!(out, "\n  {}", styles::CITATION.apply_to(citation));
                }
            }
        }
    }
    out.push('\n');
    out
}

pub fn render_status(state: &ControlState) -> String {
    let mut out = String::new();
    let selection = &state.selection;
    let location = match (selection.book(), selection.chapter(), selection.phase()) {
        (None, _, _) => "nothing selected".to_string(),
        (Some(book), None, _) => book.name.to_string(),
        (Some(book), Some(chapter), Phase::RangeChosen) => match selection.active_range() {
            Some((lo, hi)) => format!("{} {}:{}-{}", book.name, chapter, lo, hi),
            None => format!("{} {}", book.name, chapter),
        },
        (Some(book), Some(chapter), _) => match selection.verse() {
            Some(verse) => format!("{} {}:{}", book.name, chapter, verse),
            None => format!("{} {}", book.name, chapter),
        },
    };
    let _ = writeln!(out, "{} {}", styles::MUTED.apply_to("Selection:"), location);

    if let Some(current) = state.preview.current() {
        let style = if current.placeholder {
            &*styles::PLACEHOLDER
        } else {
            &*styles::REGULAR
        };
        let text = truncate_to_width(&one_line(&current.text), LINE_WIDTH - 11);
        let _ = writeln!(out, "{} {}", styles::MUTED.apply_to("Preview:  "), style.apply_to(text));
    }

    let staged = state.preview.staged();
    if !staged.is_empty() {
        let refs: Vec<&str> = staged.iter().map(|i| i.reference()).collect();
        let _ = writeln!(out, "{} {}", styles::MUTED.apply_to("Staged:   "), refs.join(", "));
    }
    if !state.live.is_empty() {
        let refs: Vec<&str> = state.live.iter().map(|i| i.reference()).collect();
        let _ = writeln!(out, "{} {}", styles::MUTED.apply_to("Live:     "), refs.join(", "));
    }
    let _ = writeln!(out, "{} {}", styles::MUTED.apply_to("Queue:    "), state.queue.len());

    let settings = &state.settings;
    let _ = writeln!(
        out,
        "{} {} | {} | dark mode {}",
        styles::MUTED.apply_to("Display:  "),
        settings.version,
        settings.font_size,
        if settings.dark_mode { "on" } else { "off" }
    );
    out
}

/// The text of the last fetch or staged note, in full.
pub fn render_preview(state: &ControlState) -> String {
    let mut out = String::new();
    if let [item] = state.preview.staged() {
        if item.is_note() {
            let _ = writeln!(out, "{}", styles::HEADING.apply_to(item.reference()));
            let _ = writeln!(out, "{}", styles::REGULAR.apply_to(item.text()));
            return out;
        }
    }
    if let Some(current) = state.preview.current() {
        let style = if current.placeholder {
            &*styles::PLACEHOLDER
        } else {
            &*styles::REGULAR
        };
        let _ = writeln!(out, "{}", styles::REFERENCE.apply_to(&current.reference));
        let _ = writeln!(out, "{}", style.apply_to(plain_text(&current.text)));
    }
    out
}

/// Resolved configuration as `key = value` lines.
pub fn render_config(config: &LecternConfig) -> String {
    let mut out = String::new();
    if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(config) {
        for (key, value) in map {
            let value = match value {
                serde_json::Value::Null => styles::FAINT.apply_to("(unset)").to_string(),
                other => other.to_string(),
            };
            let _ = writeln!(out, "{} = {}", key, value);
        }
    }
    out
}
