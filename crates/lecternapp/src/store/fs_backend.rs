use super::backend::{StorageBackend, StoreKey};
use crate::error::{LecternError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-per-key backend rooted at the data directory.
///
/// Separate processes (the control REPL and a slideshow) share state by pointing at the
/// same directory.
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: StoreKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(LecternError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, key: StoreKey) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LecternError::Io(e)),
        }
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<()> {
        self.ensure_dir()?;

        // Atomic write: a polling reader never sees a half-written snapshot
        let tmp_path = self
            .root
            .join(format!(".{}-{}.tmp", key.file_name(), Uuid::new_v4()));
        fs::write(&tmp_path, value).map_err(LecternError::Io)?;
        fs::rename(&tmp_path, self.path_for(key)).map_err(LecternError::Io)?;

        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LecternError::Io(e)),
        }
    }
}
