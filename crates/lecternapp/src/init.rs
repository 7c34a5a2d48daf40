//! # Data Location and Start-up
//!
//! Both surfaces must agree on one data directory; that shared directory is the only
//! link between a control REPL and a slideshow running as separate processes.
//!
//! ## Resolution
//!
//! [`resolve_data_dir`] picks, in order:
//! 1. An explicit override (the CLI's `--data` flag).
//! 2. The `LECTERN_DATA` environment variable. The `open` command passes it on to the
//!    slideshow it spawns, and tests use it for isolation.
//! 3. The OS data directory from `directories` (`ProjectDirs::from("com", "lectern", "lectern")`).
//!
//! Configuration is then loaded by [`load_config`] (see [`crate::config`] for layering).

use crate::api::PresenterApi;
use crate::config::LecternConfig;
use crate::error::{LecternError, Result};
use crate::lookup::http::HttpLookup;
use crate::store::fs_backend::FsBackend;
use confique::Config;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DATA_ENV: &str = "LECTERN_DATA";
pub const CONFIG_FILE: &str = "lectern.toml";

pub struct LecternContext {
    pub api: PresenterApi<FsBackend, HttpLookup>,
    pub config: LecternConfig,
    pub data_dir: PathBuf,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "lectern", "lectern")
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| LecternError::Store("Could not determine a data directory".to_string()))
}

/// Config files in the order they are consulted, highest priority first.
pub fn config_paths(data_dir: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dirs) = project_dirs() {
        paths.push(dirs.config_dir().join(CONFIG_FILE));
    }
    paths.push(data_dir.join(CONFIG_FILE));
    paths
}

pub fn load_config(data_dir: &Path) -> Result<LecternConfig> {
    let mut builder = LecternConfig::builder().env();
    for path in config_paths(data_dir) {
        builder = builder.file(path);
    }
    builder
        .load()
        .map_err(|e| LecternError::Api(format!("Invalid configuration: {}", e)))
}

/// Resolve the data directory, load configuration and build the control-surface API.
pub fn initialize(data_override: Option<PathBuf>) -> Result<LecternContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = load_config(&data_dir)?;
    tracing::debug!(data_dir = %data_dir.display(), "initializing");

    let lookup = HttpLookup::new(&config.lookup_base_url, config.lookup_timeout())?;
    let backend = FsBackend::new(&data_dir);
    let api = PresenterApi::new(backend, lookup, config.display_settings())?;

    Ok(LecternContext {
        api,
        config,
        data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_data_dir(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn data_dir_config_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "poll_interval_ms = 125\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.poll_interval_ms, 125);
    }

    #[test]
    fn config_paths_end_with_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = config_paths(dir.path());
        assert_eq!(paths.last().unwrap(), &dir.path().join(CONFIG_FILE));
    }
}
