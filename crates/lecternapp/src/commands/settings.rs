//! Display settings and background overrides.
//!
//! Font size, dark mode and version are copied into every snapshot; changing them does
//! not republish. Version and dark mode are saved as preferences and restored by
//! [`load_preferences`]. Background overrides are written straight to their own keys and
//! picked up by the slideshow on its next read.

use crate::catalog::find_version;
use crate::commands::{fetch_into_preview, CmdMessage, CmdResult, ControlState};
use crate::error::{LecternError, Result};
use crate::lookup::VerseLookup;
use crate::model::{DisplaySettings, FontSize};
use crate::publish::PublishChannel;
use crate::store::{read_text, StorageBackend, StoreKey};

/// Apply saved preferences over `defaults`. Unreadable values are ignored.
pub fn load_preferences<B: StorageBackend>(backend: &B, defaults: DisplaySettings) -> DisplaySettings {
    let mut settings = defaults;

    match read_text(backend, StoreKey::Version) {
        Ok(Some(code)) => match find_version(&code) {
            Some(version) => settings.version = version.code.to_string(),
            None => tracing::warn!(%code, "ignoring unknown saved version"),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not read saved version"),
    }

    match read_text(backend, StoreKey::DarkMode) {
        Ok(Some(value)) => match value.parse::<bool>() {
            Ok(dark) => settings.dark_mode = dark,
            Err(_) => tracing::warn!(%value, "ignoring malformed dark-mode preference"),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not read dark-mode preference"),
    }

    settings
}

pub fn set_font_size(state: &mut ControlState, size: FontSize) -> CmdResult {
    state.settings.font_size = size;
    CmdResult::default().with_message(CmdMessage::success(format!("Font size: {}", size)))
}

/// Set dark mode, or toggle it when `dark` is None.
pub fn set_dark_mode<B: StorageBackend>(
    state: &mut ControlState,
    backend: &B,
    dark: Option<bool>,
) -> Result<CmdResult> {
    let dark = dark.unwrap_or(!state.settings.dark_mode);
    backend.write(StoreKey::DarkMode, if dark { "true" } else { "false" })?;
    state.settings.dark_mode = dark;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Dark mode {}",
        if dark { "on" } else { "off" }
    ))))
}

/// Switch translation and refetch whatever is currently selected.
pub fn set_version<B: StorageBackend, L: VerseLookup + ?Sized>(
    state: &mut ControlState,
    backend: &B,
    lookup: &L,
    code: &str,
) -> Result<CmdResult> {
    let version = match find_version(code) {
        Some(version) => version,
        None => {
            return Ok(CmdResult::default().with_message(CmdMessage::warning(format!(
                "Unknown version '{}'",
                code.trim()
            ))))
        }
    };

    backend.write(StoreKey::Version, version.code)?;
    state.settings.version = version.code.to_string();

    let mut result = CmdResult::default().with_message(CmdMessage::success(format!(
        "Version: {} ({})",
        version.code, version.name
    )));
    if let Some(request) = state.selection.refetch() {
        fetch_into_preview(state, lookup, &request, &mut result);
    }
    Ok(result)
}

fn invalid_to_warning(outcome: Result<()>, success: String) -> Result<CmdResult> {
    match outcome {
        Ok(()) => Ok(CmdResult::default().with_message(CmdMessage::success(success))),
        Err(LecternError::InvalidInput(reason)) => {
            Ok(CmdResult::default().with_message(CmdMessage::warning(reason)))
        }
        Err(e) => Err(e),
    }
}

/// Set the background color override, or remove it when `color` is None.
pub fn set_background_color<B: StorageBackend>(
    channel: &PublishChannel<B>,
    color: Option<&str>,
) -> Result<CmdResult> {
    match color {
        Some(color) => invalid_to_warning(
            channel.set_background_color(color),
            format!("Background color: {}", color.trim()),
        ),
        None => invalid_to_warning(
            channel.clear_background_color(),
            "Background color cleared".to_string(),
        ),
    }
}

/// Set the background image override, or remove it when `url` is None.
pub fn set_background_image<B: StorageBackend>(
    channel: &PublishChannel<B>,
    url: Option<&str>,
) -> Result<CmdResult> {
    match url {
        Some(url) => invalid_to_warning(
            channel.set_background_image(url),
            format!("Background image: {}", url.trim()),
        ),
        None => invalid_to_warning(
            channel.clear_background_image(),
            "Background image cleared".to_string(),
        ),
    }
}
