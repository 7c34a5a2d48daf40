//! In-process notification bus.
//!
//! Every surface attaches to the bus under its own [`SurfaceId`] and receives
//! [`Notice`]s on a `std::sync::mpsc` receiver. Two delivery paths exist:
//!
//! - [`NotifyBus::broadcast`] reaches every surface **except** the origin.
//! - [`NotifyBus::signal_local`] reaches **only** the origin's own listeners.
//!
//! A publisher calls both, so its own live view updates even though the broadcast
//! skips it. Notices carry no payload beyond the changed key: receivers always re-read
//! storage, so a late or duplicated notice is harmless.

use crate::store::StoreKey;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn next() -> Self {
        SurfaceId(NEXT_SURFACE.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub origin: SurfaceId,
    pub key: StoreKey,
}

#[derive(Debug, Clone, Default)]
pub struct NotifyBus {
    listeners: Arc<Mutex<Vec<(SurfaceId, Sender<Notice>)>>>,
}

impl NotifyBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `surface`. Dropping the receiver detaches it.
    pub fn attach(&self, surface: SurfaceId) -> Receiver<Notice> {
        let (tx, rx) = channel();
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((surface, tx));
        }
        rx
    }

    pub fn broadcast(&self, notice: Notice) -> usize {
        self.deliver(notice, |surface| surface != notice.origin)
    }

    pub fn signal_local(&self, notice: Notice) -> usize {
        self.deliver(notice, |surface| surface == notice.origin)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    fn deliver(&self, notice: Notice, wants: impl Fn(SurfaceId) -> bool) -> usize {
        let mut listeners = match self.listeners.lock() {
            Ok(listeners) => listeners,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut delivered = 0;
        // Senders whose receiver is gone are pruned here
        listeners.retain(|(surface, tx)| {
            if !wants(*surface) {
                return true;
            }
            match tx.send(notice) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        tracing::trace!(?notice.key, delivered, "notice delivered");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_skips_origin() {
        let bus = NotifyBus::new();
        let control = SurfaceId::next();
        let slideshow = SurfaceId::next();
        let own = bus.attach(control);
        let other = bus.attach(slideshow);

        let notice = Notice {
            origin: control,
            key: StoreKey::Snapshot,
        };
        assert_eq!(bus.broadcast(notice), 1);
        assert_eq!(other.try_recv().unwrap(), notice);
        assert!(own.try_recv().is_err());
    }

    #[test]
    fn local_signal_reaches_only_origin() {
        let bus = NotifyBus::new();
        let control = SurfaceId::next();
        let slideshow = SurfaceId::next();
        let own = bus.attach(control);
        let other = bus.attach(slideshow);

        let notice = Notice {
            origin: control,
            key: StoreKey::Snapshot,
        };
        assert_eq!(bus.signal_local(notice), 1);
        assert_eq!(own.try_recv().unwrap(), notice);
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn every_listener_of_a_surface_is_notified() {
        let bus = NotifyBus::new();
        let origin = SurfaceId::next();
        let viewer = SurfaceId::next();
        let a = bus.attach(viewer);
        let b = bus.attach(viewer);

        bus.broadcast(Notice {
            origin,
            key: StoreKey::BackgroundColor,
        });
        assert!(a.try_recv().is_ok());
        assert!(b.try_recv().is_ok());
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let bus = NotifyBus::new();
        let origin = SurfaceId::next();
        let gone = bus.attach(SurfaceId::next());
        let _kept = bus.attach(SurfaceId::next());
        drop(gone);

        let delivered = bus.broadcast(Notice {
            origin,
            key: StoreKey::Snapshot,
        });
        assert_eq!(delivered, 1);
        assert_eq!(bus.listener_count(), 1);
    }
}
