//! # Slide Rendering
//!
//! Turns a merged [`Snapshot`] into a [`Slide`]: a UI-neutral description of what the
//! display surface should show. Front ends (the terminal slideshow, an HTML view)
//! only lay it out.
//!
//! Item kind decides the text pass:
//!
//! - Notes are markdown. They go through a sanitizing markdown pass where raw HTML is
//!   escaped, and their reference becomes a heading.
//! - Scripture text is an HTML fragment from the lookup service (or a combined range
//!   with verse markers) and is kept as-is, followed by an italic citation
//!   `"{reference} ({version})"`.
//!
//! Text tone follows background luminance. Over a background image text is always light.

use crate::catalog::DEFAULT_VERSION;
use crate::model::{FontSize, ProjectableItem, Snapshot};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use regex::Regex;

pub const WAITING_TEXT: &str = "Waiting for verse...";
pub const DEFAULT_TITLE: &str = "Lectern - Slideshow";
const DARK_BACKGROUND: &str = "#000000";
const LIGHT_BACKGROUND: &str = "#FFFFFF";
const TITLE_PREVIEW_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedItem {
    Note {
        heading: Option<String>,
        html: String,
    },
    Scripture {
        html: String,
        citation: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub title: String,
    pub background: String,
    pub background_image: Option<String>,
    pub tone: TextTone,
    pub font_size: FontSize,
    pub items: Vec<RenderedItem>,
}

impl Slide {
    pub fn is_waiting(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn render_snapshot(snapshot: &Snapshot) -> Slide {
    let background = resolve_background(snapshot);
    let tone = if snapshot.background_image.is_some() {
        TextTone::Light
    } else {
        text_tone(&background)
    };

    Slide {
        title: slide_title(snapshot),
        background,
        background_image: snapshot.background_image.clone(),
        tone,
        font_size: snapshot.font_size,
        items: snapshot
            .items
            .iter()
            .map(|item| render_item(item, snapshot))
            .collect(),
    }
}

fn render_item(item: &ProjectableItem, snapshot: &Snapshot) -> RenderedItem {
    match item {
        ProjectableItem::Note(note) => RenderedItem::Note {
            heading: Some(note.reference.trim())
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            html: markdown_to_html(&note.text),
        },
        ProjectableItem::Scripture(scripture) => {
            let version = scripture
                .version
                .as_deref()
                .filter(|v| !v.is_empty())
                .or(Some(snapshot.version.as_str()).filter(|v| !v.is_empty()))
                .unwrap_or(DEFAULT_VERSION);
            RenderedItem::Scripture {
                html: scripture.text.clone(),
                citation: Some(scripture.reference.trim())
                    .filter(|r| !r.is_empty())
                    .map(|r| format!("{} ({})", r, version)),
            }
        }
    }
}

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Keep relative URLs and the schemes in [`LINK_SCHEMES`]; anything else becomes empty.
fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    // browsers ignore whitespace and control characters inside a scheme
    let compact: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();
    let scheme = compact
        .split(['/', '?', '#'])
        .next()
        .and_then(|head| head.split_once(':'))
        .map(|(scheme, _)| scheme.to_ascii_lowercase());
    match scheme {
        Some(scheme) if !LINK_SCHEMES.contains(&scheme.as_str()) => {
            tracing::debug!(%scheme, "dropping link with unsupported scheme");
            CowStr::Borrowed("")
        }
        _ => url,
    }
}

/// Markdown to HTML with raw HTML escaped rather than passed through. Link and image
/// targets are limited to relative URLs, http, https and mailto.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::all()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some((channel(0)?, channel(1)?, channel(2)?))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

pub fn luminance((r, g, b): (u8, u8, u8)) -> f64 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0
}

/// Dark text on bright backgrounds, light text otherwise (including unparsable colors).
pub fn text_tone(background: &str) -> TextTone {
    match parse_hex_color(background) {
        Some(rgb) if luminance(rgb) > 0.5 => TextTone::Dark,
        _ => TextTone::Light,
    }
}

pub fn resolve_background(snapshot: &Snapshot) -> String {
    match &snapshot.background_color {
        Some(color) => color.clone(),
        None if snapshot.dark_mode => DARK_BACKGROUND.to_string(),
        None => LIGHT_BACKGROUND.to_string(),
    }
}

pub fn slide_title(snapshot: &Snapshot) -> String {
    let first = match snapshot.items.first() {
        Some(first) => first,
        None => return DEFAULT_TITLE.to_string(),
    };
    let label = if !first.reference().trim().is_empty() {
        first.reference().trim().to_string()
    } else {
        let text = first.text();
        if text.chars().count() > TITLE_PREVIEW_CHARS {
            format!(
                "{}...",
                text.chars().take(TITLE_PREVIEW_CHARS).collect::<String>()
            )
        } else {
            text.to_string()
        }
    };
    if label.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        format!("{} - Slideshow", label)
    }
}

static VERSE_SUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<sup[^>]*>\s*(\d+)\s*</sup>").expect("valid sup pattern"));
static BLOCK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(p|h[1-6]|li|blockquote|pre)>|<br\s*/?>").expect("valid block pattern"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

/// Flatten an HTML fragment for plain-text display. Verse markers become `[n]`.
pub fn plain_text(fragment: &str) -> String {
    let text = VERSE_SUP.replace_all(fragment, "[$1] ");
    let text = BLOCK_END.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    BLANK_RUNS.replace_all(text.trim(), "\n\n").to_string()
}
