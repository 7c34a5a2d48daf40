use crate::error::Result;

/// The fixed set of values shared between surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// The live snapshot (JSON).
    Snapshot,
    /// Background color override (CSS hex string).
    BackgroundColor,
    /// Background image override (URL). Absence means "no image".
    BackgroundImage,
    /// Projection history (JSON list, newest first).
    History,
    /// Preferred translation code.
    Version,
    /// Dark-mode preference (`true` / `false`).
    DarkMode,
}

impl StoreKey {
    pub const ALL: [StoreKey; 6] = [
        StoreKey::Snapshot,
        StoreKey::BackgroundColor,
        StoreKey::BackgroundImage,
        StoreKey::History,
        StoreKey::Version,
        StoreKey::DarkMode,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            StoreKey::Snapshot => "snapshot.json",
            StoreKey::BackgroundColor => "background-color",
            StoreKey::BackgroundImage => "background-image",
            StoreKey::History => "history.json",
            StoreKey::Version => "version",
            StoreKey::DarkMode => "dark-mode",
        }
    }
}

/// Abstract interface for the shared key/value storage.
///
/// Values are opaque strings; parsing belongs to the callers so that a corrupt value
/// can be ignored without failing the read itself. Implementations take `&self` and
/// handle their own interior mutability so that one backend can be shared by the
/// publisher, the history store and a subscriber.
pub trait StorageBackend {
    /// Read a value. Returns Ok(None) when the key has never been written or was removed.
    fn read(&self, key: StoreKey) -> Result<Option<String>>;

    /// Replace a value. MUST be atomic: readers see either the old or the new value.
    fn write(&self, key: StoreKey, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: StoreKey) -> Result<()>;
}
