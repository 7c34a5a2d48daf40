//! Compose notes in `$EDITOR`.
//!
//! Buffer format: the first line is the note title, then a blank line, then the note
//! text (markdown).

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteBuffer {
    pub title: String,
    pub text: String,
}

impl NoteBuffer {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn to_buffer(&self) -> String {
        if self.text.is_empty() {
            format!("{}\n\n", self.title)
        } else {
            format!("{}\n\n{}", self.title, self.text)
        }
    }

    pub fn from_buffer(buffer: &str) -> Self {
        let lines: Vec<&str> = buffer.lines().collect();
        let Some(first) = lines.first() else {
            return Self::new("", "");
        };

        let title = first.trim().to_string();
        let body = if lines.len() > 1 && lines[1].trim().is_empty() {
            &lines[2.min(lines.len())..]
        } else {
            // No blank separator: everything after the title is text
            &lines[1..]
        };
        Self::new(title, body.join("\n").trim_end().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.text.trim().is_empty()
    }
}

/// $EDITOR, then $VISUAL, then the first of vim/vi/nano found on PATH.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.trim().is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in ["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok(fallback.to_string());
        }
    }

    bail!("No editor found. Set $EDITOR environment variable.")
}

fn open_in_editor(path: &Path) -> Result<String> {
    let editor = get_editor()?;
    // Allow "code --wait" style values
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or("vi");

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;
    if !status.success() {
        bail!("Editor '{}' exited with non-zero status", editor);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Open the editor on `initial` and return what was saved.
pub fn edit_note(initial: &NoteBuffer) -> Result<NoteBuffer> {
    let path = env::temp_dir().join(format!("lectern-note-{}.md", std::process::id()));
    fs::write(&path, initial.to_buffer())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let edited = open_in_editor(&path);
    let _ = fs::remove_file(&path);
    Ok(NoteBuffer::from_buffer(&edited?))
}
