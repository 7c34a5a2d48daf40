//! # Subscriber Sync
//!
//! The consumer side of the sync protocol. A subscriber rebuilds what to show purely
//! from storage:
//!
//! 1. Read the snapshot key and parse it.
//! 2. Merge the background overrides: a stored color replaces the snapshot's color, a
//!    stored image replaces its image, and an absent image clears any image.
//! 3. Compare the serialized merged snapshot with what is on screen and apply it only
//!    when it differs.
//!
//! Two triggers run that refresh: notices from the [`NotifyBus`] (same process) and a
//! fixed-interval poll (any process). Either one alone converges; together they give
//! prompt updates in-process and a bounded delay across processes.
//!
//! Unreadable data never disturbs the display. A corrupt snapshot, a malformed color
//! override or a missing snapshot key all leave the current state as it was.

use crate::channel::{Notice, NotifyBus, SurfaceId};
use crate::error::Result;
use crate::model::Snapshot;
use crate::render::{parse_hex_color, render_snapshot, Slide};
use crate::store::{read_json, read_text, StorageBackend, StoreKey, Stored};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct SubscriberSync<B: StorageBackend> {
    backend: B,
    poll_interval: Duration,
    bus: Option<NotifyBus>,
    surface: SurfaceId,
    receiver: Option<Receiver<Notice>>,
    current: Option<Snapshot>,
    rendered: Option<String>,
}

impl<B: StorageBackend> SubscriberSync<B> {
    pub fn new(backend: B, poll_interval: Duration) -> Self {
        Self {
            backend,
            poll_interval,
            bus: None,
            surface: SurfaceId::next(),
            receiver: None,
            current: None,
            rendered: None,
        }
    }

    pub fn with_bus(mut self, bus: NotifyBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    /// Subscribe to the bus (if any) and load the stored snapshot once.
    pub fn activate(&mut self) -> Result<bool> {
        if let Some(bus) = &self.bus {
            if self.receiver.is_none() {
                self.receiver = Some(bus.attach(self.surface));
            }
        }
        self.refresh()
    }

    pub fn deactivate(&mut self) {
        // Dropping the receiver detaches it from the bus on the next delivery
        self.receiver = None;
    }

    pub fn on_notice(&mut self, notice: Notice) -> Result<bool> {
        tracing::trace!(key = ?notice.key, "notice received");
        self.refresh()
    }

    pub fn poll(&mut self) -> Result<bool> {
        self.refresh()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn slide(&self) -> Slide {
        match &self.current {
            Some(snapshot) => render_snapshot(snapshot),
            None => render_snapshot(&Snapshot::default()),
        }
    }

    /// Re-read storage and apply the result. Returns true when the display changed.
    fn refresh(&mut self) -> Result<bool> {
        let mut snapshot = match read_json::<_, Snapshot>(&self.backend, StoreKey::Snapshot)? {
            Stored::Value(snapshot) => snapshot,
            Stored::Missing => return Ok(false),
            Stored::Corrupt(e) => {
                tracing::warn!(error = %e, "ignoring unreadable snapshot");
                return Ok(false);
            }
        };

        if let Some(color) = read_text(&self.backend, StoreKey::BackgroundColor)? {
            if parse_hex_color(&color).is_none() {
                tracing::warn!(%color, "ignoring malformed background color");
                return Ok(false);
            }
            snapshot.background_color = Some(color);
        }
        snapshot.background_image = read_text(&self.backend, StoreKey::BackgroundImage)?;

        let serialized = serde_json::to_string(&snapshot)?;
        if self.rendered.as_deref() == Some(serialized.as_str()) {
            return Ok(false);
        }

        tracing::debug!(sequence = snapshot.sequence, "applying snapshot");
        self.rendered = Some(serialized);
        self.current = Some(snapshot);
        Ok(true)
    }

    /// Run until `stop` is set, calling `on_render` whenever the display changes.
    ///
    /// Waits on the bus receiver with the poll interval as timeout: a notice refreshes
    /// immediately, a timeout polls. Read errors are logged and the loop continues.
    pub fn run<F>(&mut self, stop: &AtomicBool, mut on_render: F)
    where
        F: FnMut(&Snapshot),
    {
        match self.activate() {
            Ok(true) => self.emit(&mut on_render),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "initial snapshot read failed"),
        }

        while !stop.load(Ordering::SeqCst) {
            let outcome = match self.wait() {
                Wake::Notice(notice) => self.on_notice(notice),
                Wake::Timeout => self.poll(),
            };
            if stop.load(Ordering::SeqCst) {
                break;
            }
            match outcome {
                Ok(true) => self.emit(&mut on_render),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "snapshot refresh failed"),
            }
        }

        self.deactivate();
    }

    fn wait(&mut self) -> Wake {
        let receiver = match &self.receiver {
            Some(receiver) => receiver,
            None => {
                thread::sleep(self.poll_interval);
                return Wake::Timeout;
            }
        };
        match receiver.recv_timeout(self.poll_interval) {
            Ok(notice) => Wake::Notice(notice),
            Err(RecvTimeoutError::Timeout) => Wake::Timeout,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("notify bus gone, polling only");
                self.receiver = None;
                Wake::Timeout
            }
        }
    }

    fn emit<F: FnMut(&Snapshot)>(&self, on_render: &mut F) {
        if let Some(snapshot) = &self.current {
            on_render(snapshot);
        }
    }
}

enum Wake {
    Notice(Notice),
    Timeout,
}

impl<B: StorageBackend + Send + 'static> SubscriberSync<B> {
    /// Run on a dedicated thread. Stopping or dropping the handle ends the loop.
    pub fn spawn<F>(mut self, on_render: F) -> SubscriberHandle
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = thread::spawn(move || self.run(&flag, on_render));
        SubscriberHandle {
            stop,
            thread: Some(thread),
        }
    }
}

pub struct SubscriberHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SubscriberHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("subscriber thread panicked");
            }
        }
    }
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
