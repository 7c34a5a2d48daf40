//! # Publish Channel
//!
//! The producer side of the sync protocol. Publishing is fire-and-forget:
//!
//! 1. Stamp the snapshot with the next sequence number (stored sequence + 1).
//! 2. Serialize and overwrite the snapshot key.
//! 3. Broadcast a [`Notice`] to other surfaces and signal the producer's own
//!    listeners.
//!
//! The channel never waits for subscribers and has no idea whether any exist. Late
//! joiners read the snapshot key directly.
//!
//! Background overrides live under their own keys and are merged by subscribers on
//! every read, so changing them does not republish the snapshot.

use crate::channel::{Notice, NotifyBus, SurfaceId};
use crate::error::{LecternError, Result};
use crate::model::{DisplaySettings, ProjectableItem, Snapshot};
use crate::render::parse_hex_color;
use crate::store::{read_json, StorageBackend, StoreKey, Stored};
use std::collections::HashSet;

pub struct PublishChannel<B: StorageBackend> {
    backend: B,
    bus: Option<NotifyBus>,
    surface: SurfaceId,
}

impl<B: StorageBackend> PublishChannel<B> {
    /// A channel whose only delivery path is storage.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            bus: None,
            surface: SurfaceId::next(),
        }
    }

    pub fn with_bus(backend: B, bus: NotifyBus, surface: SurfaceId) -> Self {
        Self {
            backend,
            bus: Some(bus),
            surface,
        }
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn publish(
        &self,
        items: Vec<ProjectableItem>,
        settings: &DisplaySettings,
    ) -> Result<Snapshot> {
        let mut seen = HashSet::new();
        let items: Vec<ProjectableItem> = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.id().to_string());
                if !fresh {
                    tracing::warn!(id = item.id(), "dropping duplicate item id");
                }
                fresh
            })
            .collect();

        let mut snapshot = settings.snapshot(items);
        snapshot.sequence = self.last_sequence()? + 1;

        let json = serde_json::to_string(&snapshot)?;
        self.backend.write(StoreKey::Snapshot, &json)?;
        tracing::info!(
            sequence = snapshot.sequence,
            items = snapshot.items.len(),
            "snapshot published"
        );

        self.notify(StoreKey::Snapshot);
        Ok(snapshot)
    }

    /// The live snapshot as stored, if it can be read.
    pub fn live(&self) -> Result<Option<Snapshot>> {
        Ok(read_json(&self.backend, StoreKey::Snapshot)?.value())
    }

    pub fn set_background_color(&self, color: &str) -> Result<()> {
        let color = color.trim();
        if parse_hex_color(color).is_none() {
            return Err(LecternError::InvalidInput(format!(
                "'{}' is not a hex color (expected #rgb or #rrggbb)",
                color
            )));
        }
        self.backend.write(StoreKey::BackgroundColor, color)?;
        self.notify(StoreKey::BackgroundColor);
        Ok(())
    }

    pub fn clear_background_color(&self) -> Result<()> {
        self.backend.remove(StoreKey::BackgroundColor)?;
        self.notify(StoreKey::BackgroundColor);
        Ok(())
    }

    pub fn set_background_image(&self, url: &str) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LecternError::InvalidInput(
                "background image URL is empty".to_string(),
            ));
        }
        self.backend.write(StoreKey::BackgroundImage, url)?;
        self.notify(StoreKey::BackgroundImage);
        Ok(())
    }

    pub fn clear_background_image(&self) -> Result<()> {
        self.backend.remove(StoreKey::BackgroundImage)?;
        self.notify(StoreKey::BackgroundImage);
        Ok(())
    }

    fn last_sequence(&self) -> Result<u64> {
        Ok(match read_json::<_, Snapshot>(&self.backend, StoreKey::Snapshot)? {
            Stored::Value(previous) => previous.sequence,
            Stored::Missing | Stored::Corrupt(_) => 0,
        })
    }

    fn notify(&self, key: StoreKey) {
        if let Some(bus) = &self.bus {
            let notice = Notice {
                origin: self.surface,
                key,
            };
            bus.broadcast(notice);
            bus.signal_local(notice);
        }
    }
}
