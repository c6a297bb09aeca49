//! Synchronization: reconciler, transports, and the session tying them to
//! a store.

mod reconciler;
mod transport;
mod types;

pub use reconciler::Reconciler;
pub use transport::{CrossTabBroadcast, RemoteSubscription, SyncTransport, TabBus, TabEndpoint};
pub use types::{PeerMessage, SessionId, SyncStatus};

use crate::calendar::{CalendarEntry, EntryDraft};
use crate::error::Result;
use crate::store::EventStore;

/// A running instance's view of the shared calendar: store + transport +
/// reconciler, wired together.
///
/// All mutations flow through here so the write path is uniform: write to
/// the store, refresh local state, persist the mirror, stamp, publish.
pub struct SyncSession<S: EventStore, T: SyncTransport> {
    store: S,
    transport: T,
    reconciler: Reconciler,
}

impl<S: EventStore, T: SyncTransport> SyncSession<S, T> {
    pub fn new(store: S, transport: T) -> Self {
        Self {
            store,
            transport,
            reconciler: Reconciler::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn reconciler_mut(&mut self) -> &mut Reconciler {
        &mut self.reconciler
    }

    /// Current entry list as the reconciler holds it.
    pub fn events(&self) -> &[CalendarEntry] {
        self.reconciler.events()
    }

    pub fn status(&self) -> SyncStatus {
        self.reconciler.status()
    }

    /// Drain pending transport input. Call once per event-loop turn.
    pub fn pump(&mut self) -> Result<()> {
        self.transport.pump(&mut self.reconciler)
    }

    /// Explicit full reload from the store, bypassing the feed.
    pub fn force_refresh(&mut self) -> Result<()> {
        self.reconciler.mark_syncing();
        match self.store.list() {
            Ok(entries) => {
                self.reconciler.apply_remote_snapshot(entries);
                Ok(())
            }
            Err(e) => {
                self.reconciler.mark_error();
                Err(e.into())
            }
        }
    }

    /// Write path for a new entry.
    pub fn create_entry(&mut self, draft: EntryDraft) -> Result<CalendarEntry> {
        self.reconciler.mark_syncing();
        let created = match self.store.create(draft) {
            Ok(created) => created,
            Err(e) => {
                self.reconciler.mark_error();
                return Err(e.into());
            }
        };
        self.after_mutation()?;
        Ok(created)
    }

    /// Write path for a deletion. Clears the selection when it pointed at
    /// the deleted entry.
    pub fn delete_entry(&mut self, id: &str) -> Result<()> {
        self.reconciler.mark_syncing();
        if let Err(e) = self.store.delete(id) {
            self.reconciler.mark_error();
            return Err(e.into());
        }
        if self.reconciler.selected_entry().map(|e| e.id.as_str()) == Some(id) {
            self.reconciler.clear_selection();
        }
        self.after_mutation()?;
        Ok(())
    }

    /// Refresh from the store, persist the mirror, publish to peers.
    fn after_mutation(&mut self) -> Result<()> {
        match self.store.list() {
            Ok(entries) => self.reconciler.apply_remote_snapshot(entries),
            Err(e) => {
                self.reconciler.mark_error();
                return Err(e.into());
            }
        }
        if let Err(e) = self.transport.publish(&mut self.reconciler) {
            self.reconciler.mark_error();
            return Err(e);
        }
        Ok(())
    }
}
