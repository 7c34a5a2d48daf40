//! # Control Panel REPL
//!
//! One command per line, read from stdin. Parsing is separate from dispatch so it can be
//! tested without a terminal or a data directory.
//!
//! Notes take `title | text`. Without a `|` the whole argument is the text and the
//! title is empty.

use lecternapp::selection::Modifiers;
use std::fmt;

pub const HELP: &str = "\
Navigation
  books [query]          list or search books
  book <name>            select a book
  chapter <n>            select a chapter
  verse <n>              preview a verse
  shift <n>              extend the selection to a range
  commit <n>             preview and go live in one step
Queue
  queue                  queue the current preview
  unqueue <n|id>         remove a queued item
  queue-list             show the queue
  clear-queue            empty the queue
Notes
  note <title | text>        preview a note
  note-live <title | text>   project a note now
  note-queue <title | text>  queue a note
  note-edit [title]          compose a note in $EDITOR and preview it
Live
  live                   publish queue, preview or current text
  history                list projection history
  replay <n>             put history entry n back on screen
  clear-history          remove every history entry
Display
  font <small|medium|large|extra-large>
  dark [on|off]          set or toggle dark mode
  version <code>         switch translation
  bg <#hex|none>         background color override
  bg-image <url|none>    background image override
  open                   start a slideshow window
Other
  status                 show the current selection and settings
  help                   this text
  quit                   leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Books(Option<String>),
    Book(String),
    Chapter(u32),
    Verse(u32, Modifiers),
    Commit(u32),
    Queue,
    Unqueue(String),
    QueueList,
    ClearQueue,
    Note { title: String, text: String },
    NoteLive { title: String, text: String },
    NoteQueue { title: String, text: String },
    NoteEdit(String),
    Live,
    History,
    Replay(usize),
    ClearHistory,
    Font(String),
    Dark(Option<bool>),
    Version(String),
    Background(Option<String>),
    BackgroundImage(Option<String>),
    Open,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    Usage(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => f.write_str("empty command"),
            ParseError::Unknown(word) => {
                write!(f, "Unknown command '{}'. Type `help` for a list.", word)
            }
            ParseError::Usage(usage) => write!(f, "Usage: {}", usage),
        }
    }
}

impl std::error::Error for ParseError {}

fn number<T: std::str::FromStr>(arg: &str, usage: &'static str) -> Result<T, ParseError> {
    arg.trim().parse().map_err(|_| ParseError::Usage(usage))
}

fn required(arg: &str, usage: &'static str) -> Result<String, ParseError> {
    let arg = arg.trim();
    if arg.is_empty() {
        Err(ParseError::Usage(usage))
    } else {
        Ok(arg.to_string())
    }
}

/// `none`, `clear` and `off` remove an override.
fn optional_override(arg: &str, usage: &'static str) -> Result<Option<String>, ParseError> {
    let arg = required(arg, usage)?;
    match arg.to_lowercase().as_str() {
        "none" | "clear" | "off" => Ok(None),
        _ => Ok(Some(arg)),
    }
}

/// Split `title | text`. Literal `\n` in the text becomes a line break.
pub fn split_note(arg: &str) -> (String, String) {
    let (title, text) = match arg.split_once('|') {
        Some((title, text)) => (title.trim(), text.trim()),
        None => ("", arg.trim()),
    };
    (title.to_string(), text.replace("\\n", "\n"))
}

pub fn parse(line: &str) -> Result<ReplCommand, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "books" => ReplCommand::Books(Some(arg.to_string()).filter(|a| !a.is_empty())),
        "book" | "b" => ReplCommand::Book(required(arg, "book <name>")?),
        "chapter" | "ch" => ReplCommand::Chapter(number(arg, "chapter <n>")?),
        "verse" | "v" => ReplCommand::Verse(number(arg, "verse <n>")?, Modifiers::NONE),
        "shift" => ReplCommand::Verse(number(arg, "shift <n>")?, Modifiers::SHIFT),
        "commit" | "go" => ReplCommand::Commit(number(arg, "commit <n>")?),
        "queue" | "q" => ReplCommand::Queue,
        "unqueue" => ReplCommand::Unqueue(required(arg, "unqueue <position|id>")?),
        "queue-list" | "ql" => ReplCommand::QueueList,
        "clear-queue" => ReplCommand::ClearQueue,
        "note" | "note-live" | "note-queue" => {
            let (title, text) = split_note(arg);
            match word.to_lowercase().as_str() {
                "note" => ReplCommand::Note { title, text },
                "note-live" => ReplCommand::NoteLive { title, text },
                _ => ReplCommand::NoteQueue { title, text },
            }
        }
        "note-edit" => ReplCommand::NoteEdit(arg.to_string()),
        "live" | "l" => ReplCommand::Live,
        "history" => ReplCommand::History,
        "replay" => ReplCommand::Replay(number(arg, "replay <n>")?),
        "clear-history" => ReplCommand::ClearHistory,
        "font" => ReplCommand::Font(required(arg, "font <small|medium|large|extra-large>")?),
        "dark" => ReplCommand::Dark(match arg.to_lowercase().as_str() {
            "" => None,
            "on" | "true" | "yes" => Some(true),
            "off" | "false" | "no" => Some(false),
            _ => return Err(ParseError::Usage("dark [on|off]")),
        }),
        "version" => ReplCommand::Version(required(arg, "version <code>")?),
        "bg" => ReplCommand::Background(optional_override(arg, "bg <#hex|none>")?),
        "bg-image" => ReplCommand::BackgroundImage(optional_override(arg, "bg-image <url|none>")?),
        "open" => ReplCommand::Open,
        "status" => ReplCommand::Status,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}
