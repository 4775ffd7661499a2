//! Fan-out broadcaster for catalog mutation events.
//!
//! The bus owns the registry of live subscribers; each subscriber owns a
//! bounded queue. `publish` snapshots the registry, then enqueues without
//! blocking: a full queue drops the incoming frame for that subscriber
//! only (drop-newest — earlier frames keep their order and other
//! subscribers are unaffected), and a closed queue gets its entry pruned.
//! A publish problem never fails the mutation that triggered it.
//!
//! Subscription teardown is deterministic: dropping a [`Subscription`]
//! (or calling [`Subscription::disconnect`]) unregisters it from the bus,
//! so a disconnecting client cannot leak a registry entry.

use super::frame::{ChangeEvent, EventFrame};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{Duration, timeout};

/// Frames a subscriber may lag behind before the bus starts dropping.
pub const DEFAULT_QUEUE_DEPTH: usize = 32;

/// Multi-subscriber broadcast bus.
///
/// Cloning shares the registry: the store and any number of adapter tasks
/// hold clones of one bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

#[derive(Debug)]
struct BusInner {
    queue_depth: usize,
    next_subscriber_id: AtomicU64,
    senders: Mutex<HashMap<u64, mpsc::Sender<EventFrame>>>,
}

impl BusInner {
    // Publish must keep working even after a panic poisoned the lock.
    fn registry(&self) -> MutexGuard<'_, HashMap<u64, mpsc::Sender<EventFrame>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Delivery accounting for one `publish` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanoutReport {
    /// Subscribers whose queue accepted the frame.
    pub delivered: usize,
    /// Subscribers whose full queue forced the frame to be dropped.
    pub dropped: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_queue_depth(DEFAULT_QUEUE_DEPTH)
    }

    /// Bus whose subscribers buffer at most `queue_depth` frames.
    pub fn with_queue_depth(queue_depth: usize) -> Self {
        Self {
            inner: Arc::new(BusInner {
                queue_depth: queue_depth.max(1),
                next_subscriber_id: AtomicU64::new(1),
                senders: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Register a listener. Its first frame is always `connected`.
    pub fn subscribe(&self) -> Subscription {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.inner.queue_depth);

        // Queue depth is at least 1 and the channel is empty, so the
        // greeting always fits.
        let _ = tx.try_send(EventFrame::connected());
        self.inner.registry().insert(id, tx);

        debug!("subscriber {} registered", id);
        Subscription {
            id,
            connected_since: Utc::now(),
            receiver: rx,
            bus: Arc::clone(&self.inner),
        }
    }

    /// Broadcast one event to every currently-registered subscriber.
    ///
    /// Iterates a snapshot of the registry, so concurrent subscribes and
    /// unsubscribes never corrupt an in-flight broadcast; a subscriber
    /// added mid-publish simply misses this event.
    pub fn publish(&self, event: ChangeEvent) -> FanoutReport {
        let snapshot: Vec<(u64, mpsc::Sender<EventFrame>)> = self
            .inner
            .registry()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let frame = EventFrame::from(event);
        let mut report = FanoutReport::default();
        let mut closed = Vec::new();

        for (id, tx) in snapshot {
            match tx.try_send(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    report.dropped += 1;
                    warn!(
                        "subscriber {} queue full, dropping {:?} frame",
                        id, frame.kind
                    );
                }
                Err(TrySendError::Closed(_)) => closed.push(id),
            }
        }

        if !closed.is_empty() {
            let mut registry = self.inner.registry();
            for id in closed {
                registry.remove(&id);
                debug!("pruned closed subscriber {}", id);
            }
        }

        report
    }

    /// Number of currently-registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry().len()
    }
}

/// One live listener: the receiving half of a bounded queue plus the
/// registration it will tear down on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    connected_since: DateTime<Utc>,
    receiver: mpsc::Receiver<EventFrame>,
    bus: Arc<BusInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn connected_since(&self) -> DateTime<Utc> {
        self.connected_since
    }

    /// Wait for the next frame with a bounded idle window.
    ///
    /// Yields a `heartbeat` frame when `idle` elapses with nothing queued
    /// — timeouts keep the transport alive, they are not errors. Returns
    /// `None` only when the bus side of the queue is gone.
    pub async fn next_frame(&mut self, idle: Duration) -> Option<EventFrame> {
        match timeout(idle, self.receiver.recv()).await {
            Ok(Some(frame)) => Some(frame),
            Ok(None) => None,
            Err(_) => Some(EventFrame::heartbeat()),
        }
    }

    /// Frame already queued, if any. Never waits.
    pub fn try_next_frame(&mut self) -> Option<EventFrame> {
        self.receiver.try_recv().ok()
    }

    /// Explicit teardown; equivalent to dropping the subscription.
    pub fn disconnect(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.bus.senders.lock() {
            registry.remove(&self.id);
        }
        debug!("subscriber {} unregistered", self.id);
    }
}
