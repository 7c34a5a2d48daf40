//! # Configuration
//!
//! Lectern configuration is loaded with [`confique`] from layered sources.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `LECTERN_DEFAULT_VERSION`, `LECTERN_POLL_INTERVAL_MS`, etc.
//! 2. **User Config**: `lectern.toml` in the OS config directory (via `directories`).
//! 3. **Data Config**: `lectern.toml` next to the shared state in the data directory.
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `default_version` | `KJV` | Translation used until the operator picks one |
//! | `font_size` | `extra-large` | Starting font size for published snapshots |
//! | `dark_mode` | `true` | Starting dark-mode flag (a saved preference wins) |
//! | `poll_interval_ms` | `500` | Slideshow poll interval |
//! | `lookup_base_url` | `https://bolls.life` | Verse lookup service |
//! | `lookup_timeout_secs` | `10` | Per-request lookup timeout |
//! | `slideshow_command` | unset | Command `open` runs to start a slideshow window |

use crate::catalog::{find_version, DEFAULT_VERSION};
use crate::lookup::http::DEFAULT_BASE_URL;
use crate::model::{DisplaySettings, FontSize};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LecternConfig {
    /// Translation code used until the operator picks one (e.g. "KJV", "ESV").
    #[config(default = "KJV", env = "LECTERN_DEFAULT_VERSION")]
    pub default_version: String,

    /// One of "small", "medium", "large", "extra-large".
    #[config(default = "extra-large", env = "LECTERN_FONT_SIZE")]
    pub font_size: String,

    #[config(default = true, env = "LECTERN_DARK_MODE")]
    pub dark_mode: bool,

    /// How often the slideshow re-reads shared state, in milliseconds.
    #[config(default = 500, env = "LECTERN_POLL_INTERVAL_MS")]
    pub poll_interval_ms: u64,

    #[config(default = "https://bolls.life", env = "LECTERN_LOOKUP_BASE_URL")]
    pub lookup_base_url: String,

    #[config(default = 10, env = "LECTERN_LOOKUP_TIMEOUT_SECS")]
    pub lookup_timeout_secs: u64,

    /// Command line used by `open` to start the slideshow surface. `open` refuses when unset.
    #[config(env = "LECTERN_SLIDESHOW_COMMAND")]
    pub slideshow_command: Option<String>,
}

impl Default for LecternConfig {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_VERSION.to_string(),
            font_size: FontSize::ExtraLarge.to_string(),
            dark_mode: true,
            poll_interval_ms: 500,
            lookup_base_url: DEFAULT_BASE_URL.to_string(),
            lookup_timeout_secs: 10,
            slideshow_command: None,
        }
    }
}

impl LecternConfig {
    /// Configured font size, falling back to extra-large when unrecognized.
    pub fn font_size(&self) -> FontSize {
        self.font_size.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %self.font_size, "unknown font_size in config");
            FontSize::default()
        })
    }

    /// Configured translation, falling back to the default when unknown.
    pub fn default_version(&self) -> String {
        match find_version(&self.default_version) {
            Some(version) => version.code.to_string(),
            None => {
                tracing::warn!(value = %self.default_version, "unknown default_version in config");
                DEFAULT_VERSION.to_string()
            }
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs.max(1))
    }

    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            font_size: self.font_size(),
            dark_mode: self.dark_mode,
            version: self.default_version(),
        }
    }
}
