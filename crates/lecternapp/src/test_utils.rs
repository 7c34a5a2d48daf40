use crate::api::PresenterApi;
use crate::lookup::memory::MemLookup;
use crate::model::DisplaySettings;
use crate::store::fs_backend::FsBackend;
use std::path::PathBuf;
use tempfile::TempDir;

/// A control surface over a throwaway data directory.
pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub backend: FsBackend,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let backend = FsBackend::new(&root);
        Self {
            _temp_dir: temp_dir,
            backend,
            root,
        }
    }

    /// John 3:16-18 and John 11:35 (KJV).
    pub fn lookup() -> MemLookup {
        MemLookup::new()
            .with_verse("KJV", 43, 3, 16, "For God<S>2316</S> so loved the world")
            .with_verse("KJV", 43, 3, 17, "For God sent not his Son into the world")
            .with_verse("KJV", 43, 3, 18, "He that believeth on him is not condemned")
            .with_verse("KJV", 43, 11, 35, "Jesus wept.")
    }

    pub fn api(&self) -> PresenterApi<FsBackend, MemLookup> {
        PresenterApi::new(self.backend.clone(), Self::lookup(), DisplaySettings::default())
            .expect("failed to build api")
    }
}
