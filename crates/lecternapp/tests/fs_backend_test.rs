use lecternapp::store::backend::{StorageBackend, StoreKey};
use lecternapp::store::fs_backend::FsBackend;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

#[test]
fn test_fs_backend_round_trip_per_key() {
    let (_dir, backend) = setup();

    for key in StoreKey::ALL {
        assert_eq!(backend.read(key).unwrap(), None);
    }

    backend.write(StoreKey::Version, "ESV").unwrap();
    backend.write(StoreKey::DarkMode, "false").unwrap();
    assert_eq!(backend.read(StoreKey::Version).unwrap().as_deref(), Some("ESV"));
    assert_eq!(backend.read(StoreKey::DarkMode).unwrap().as_deref(), Some("false"));

    backend.remove(StoreKey::Version).unwrap();
    assert_eq!(backend.read(StoreKey::Version).unwrap(), None);
}

#[test]
fn test_fs_backend_creates_data_dir_on_first_write() {
    let (dir, backend) = setup();
    assert!(!dir.path().join("data").exists());

    backend.write(StoreKey::Snapshot, "{}").unwrap();
    assert!(dir.path().join("data").join("snapshot.json").exists());
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (_dir, backend) = setup();
    backend.write(StoreKey::History, "[]").unwrap();
    backend.write(StoreKey::History, "[ ]").unwrap();

    let on_disk = fs::read_to_string(backend.path_for(StoreKey::History)).unwrap();
    assert_eq!(on_disk, "[ ]");

    // Verify NO .tmp files are left behind
    for entry in fs::read_dir(backend.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_remove_missing_is_ok() {
    let (_dir, backend) = setup();
    backend.remove(StoreKey::BackgroundImage).unwrap();
}

#[test]
fn test_fs_backends_on_same_dir_share_state() {
    let (_dir, producer) = setup();
    let consumer = FsBackend::new(producer.root().to_path_buf());

    producer.write(StoreKey::BackgroundColor, "#1e293b").unwrap();
    assert_eq!(
        consumer.read(StoreKey::BackgroundColor).unwrap().as_deref(),
        Some("#1e293b")
    );
}
