use super::backend::{StorageBackend, StoreKey};
use crate::error::{LecternError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory storage backend.
///
/// Cloning shares the underlying map, so a control surface and a slideshow running on
/// another thread can observe each other's writes exactly like two windows sharing
/// one storage area.
#[derive(Clone, Default)]
pub struct MemBackend {
    values: Arc<Mutex<HashMap<StoreKey, String>>>,
    simulate_write_error: Arc<AtomicBool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    fn values(&self) -> Result<MutexGuard<'_, HashMap<StoreKey, String>>> {
        self.values
            .lock()
            .map_err(|_| LecternError::Store("memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(LecternError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, key: StoreKey) -> Result<Option<String>> {
        Ok(self.values()?.get(&key).cloned())
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<()> {
        self.check_writable()?;
        self.values()?.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<()> {
        self.check_writable()?;
        self.values()?.remove(&key);
        Ok(())
    }
}
