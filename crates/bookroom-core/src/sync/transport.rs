//! Sync transports: how reconciler input arrives and local writes fan out.
//!
//! Two variants, selected at configuration time. [`RemoteSubscription`] is
//! the authoritative one (works across devices): it drains the store's
//! snapshot feed and runs a secondary timer poll against the local mirror
//! to catch same-device writers that bypass the subscription.
//! [`CrossTabBroadcast`] is same-device only: peers converge through a
//! broadcast bus and the shared mirror, with no remote store at all.
//!
//! Transport failures never propagate out of `pump`/`publish` as panics;
//! they set [`SyncStatus::Error`](super::SyncStatus) on the reconciler and
//! the next scheduled poll or snapshot delivery is the only retry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::reconciler::Reconciler;
use super::types::PeerMessage;
use crate::error::CoreError;
use crate::store::{EventStore, LocalMirror, Snapshot};

/// A reconciler's connection to everything outside its own instance.
pub trait SyncTransport {
    /// Drain pending input (snapshots, peer messages, poll results) into
    /// the reconciler.
    fn pump(&mut self, reconciler: &mut Reconciler) -> Result<(), CoreError>;

    /// Propagate a local mutation: persist the mirror, stamp the
    /// reconciler, and notify peers where the variant has any.
    fn publish(&mut self, reconciler: &mut Reconciler) -> Result<(), CoreError>;
}

/// Store-subscription transport with a secondary mirror poll.
pub struct RemoteSubscription {
    feed: mpsc::Receiver<Snapshot>,
    mirror: LocalMirror,
    poll_interval: Duration,
    last_poll: Option<Instant>,
}

impl RemoteSubscription {
    /// Attach to a store's change feed.
    pub fn attach<S: EventStore + ?Sized>(
        store: &S,
        mirror: LocalMirror,
        poll_interval: Duration,
    ) -> Self {
        Self {
            feed: store.subscribe(),
            mirror,
            poll_interval,
            last_poll: None,
        }
    }

    fn poll_due(&self) -> bool {
        match self.last_poll {
            None => true,
            Some(at) => at.elapsed() >= self.poll_interval,
        }
    }

    /// Check the mirror stamp and reload from it when a same-device writer
    /// left newer state than this instance has processed.
    fn poll_mirror(&mut self, reconciler: &mut Reconciler) {
        self.last_poll = Some(Instant::now());
        let stamp = match self.mirror.last_update() {
            Ok(Some(stamp)) => stamp,
            Ok(None) => return,
            Err(_) => {
                reconciler.mark_error();
                return;
            }
        };
        if !reconciler.observe_mirror_timestamp(stamp) {
            return;
        }
        match self.mirror.load() {
            Ok(Some(state)) => reconciler.apply_mirror_state(state.events, state.last_update),
            Ok(None) => {}
            Err(_) => reconciler.mark_error(),
        }
    }
}

impl SyncTransport for RemoteSubscription {
    fn pump(&mut self, reconciler: &mut Reconciler) -> Result<(), CoreError> {
        loop {
            match self.feed.try_recv() {
                Ok(Ok(snapshot)) => reconciler.apply_remote_snapshot(snapshot),
                Ok(Err(_)) => reconciler.mark_error(),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    reconciler.mark_error();
                    break;
                }
            }
        }
        if self.poll_due() {
            self.poll_mirror(reconciler);
        }
        Ok(())
    }

    fn publish(&mut self, reconciler: &mut Reconciler) -> Result<(), CoreError> {
        let stamp = self.mirror.save(reconciler.events())?;
        reconciler.note_local_write(stamp);
        Ok(())
    }
}

/// In-process stand-in for a same-device broadcast channel: every message
/// is delivered to all joined endpoints except the sender.
#[derive(Clone, Default)]
pub struct TabBus {
    peers: Arc<Mutex<Vec<(usize, mpsc::Sender<PeerMessage>)>>>,
    next_id: Arc<AtomicUsize>,
}

impl TabBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the bus as a new peer.
    pub fn join(&self) -> TabEndpoint {
        let (tx, rx) = mpsc::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut peers) = self.peers.lock() {
            peers.push((id, tx));
        }
        TabEndpoint {
            bus: self.clone(),
            id,
            rx,
        }
    }

    fn send_from(&self, sender: usize, msg: &PeerMessage) {
        if let Ok(mut peers) = self.peers.lock() {
            peers.retain(|(id, tx)| *id == sender || tx.send(msg.clone()).is_ok());
        }
    }
}

/// One peer's handle on the [`TabBus`].
pub struct TabEndpoint {
    bus: TabBus,
    id: usize,
    rx: mpsc::Receiver<PeerMessage>,
}

impl TabEndpoint {
    /// Broadcast to every other peer.
    pub fn send(&self, msg: &PeerMessage) {
        self.bus.send_from(self.id, msg);
    }

    /// Next pending message, if any.
    pub fn try_recv(&self) -> Option<PeerMessage> {
        self.rx.try_recv().ok()
    }
}

/// Same-device broadcast transport. No remote store; state lives in the
/// mirror and converges across peers via [`PeerMessage`]s.
pub struct CrossTabBroadcast {
    endpoint: TabEndpoint,
    mirror: LocalMirror,
    announced: bool,
}

impl CrossTabBroadcast {
    pub fn join(bus: &TabBus, mirror: LocalMirror) -> Self {
        Self {
            endpoint: bus.join(),
            mirror,
            announced: false,
        }
    }

    /// First pump: load whatever the mirror holds, then ask the other
    /// peers for anything newer.
    fn announce(&mut self, reconciler: &mut Reconciler) {
        self.announced = true;
        match self.mirror.load() {
            Ok(Some(state)) => reconciler.apply_mirror_state(state.events, state.last_update),
            Ok(None) => {}
            Err(_) => reconciler.mark_error(),
        }
        self.endpoint.send(&reconciler.broadcast_request());
    }
}

impl SyncTransport for CrossTabBroadcast {
    fn pump(&mut self, reconciler: &mut Reconciler) -> Result<(), CoreError> {
        if !self.announced {
            self.announce(reconciler);
        }
        while let Some(msg) = self.endpoint.try_recv() {
            if let Some(reply) = reconciler.apply_peer_message(&msg) {
                self.endpoint.send(&reply);
            }
        }
        Ok(())
    }

    fn publish(&mut self, reconciler: &mut Reconciler) -> Result<(), CoreError> {
        let stamp = self.mirror.save(reconciler.events())?;
        reconciler.note_local_write(stamp);
        self.endpoint.send(&reconciler.broadcast_update());
        Ok(())
    }
}
