//! Reconciliation of the local in-memory entry list against remote
//! snapshots, peer broadcasts, and the mirror poll path.
//!
//! The reconciler is the exclusive owner of the entry list; the
//! presentation layer and the booking workflow read it and request
//! mutations through the write path, never mutating it directly.
//!
//! Conflict policy is last-write-wins by timestamp: an incoming list
//! replaces the local one iff its stamp is strictly greater. There is no
//! merge and no per-field reconciliation; this is a single-admin,
//! low-contention tool, not a consistency protocol.

use chrono::{DateTime, Utc};

use super::types::{PeerMessage, SessionId, SyncStatus};
use crate::calendar::CalendarEntry;

/// Sort for display: date ascending, then start hour ascending.
fn sort_for_display(entries: &mut [CalendarEntry]) {
    entries.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then(a.start_time.hour().cmp(&b.start_time.hour()))
    });
}

/// Local synchronization state for one running instance.
pub struct Reconciler {
    session: SessionId,
    events: Vec<CalendarEntry>,
    selected: Option<String>,
    status: SyncStatus,
    /// Stamp of the newest state this instance holds.
    last_update: DateTime<Utc>,
    /// Newest mirror stamp this instance has already processed.
    last_checked: DateTime<Utc>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            session: SessionId::generate(),
            events: Vec::new(),
            selected: None,
            status: SyncStatus::Synced,
            // A fresh instance holds nothing, so any peer update is newer.
            last_update: DateTime::UNIX_EPOCH,
            // The poll path only cares about stamps written after load.
            last_checked: Utc::now(),
        }
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn events(&self) -> &[CalendarEntry] {
        &self.events
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    /// Mark a sync operation in flight.
    pub fn mark_syncing(&mut self) {
        self.status = SyncStatus::Syncing;
    }

    /// Record a transport failure. The next snapshot or poll clears it.
    pub fn mark_error(&mut self) {
        self.status = SyncStatus::Error;
    }

    /// Select an entry for the details/slots view.
    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The currently selected entry, looked up in the live list so a
    /// refreshed snapshot is never read through a stale copy.
    pub fn selected_entry(&self) -> Option<&CalendarEntry> {
        let id = self.selected.as_deref()?;
        self.events.iter().find(|e| e.id == id)
    }

    /// Replace local state with an authoritative remote snapshot.
    ///
    /// The list is re-sorted for display. If the selected entry no longer
    /// exists in the snapshot the selection id is kept as-is (deletion
    /// flows clear it explicitly); `selected_entry` simply finds nothing.
    pub fn apply_remote_snapshot(&mut self, mut snapshot: Vec<CalendarEntry>) {
        sort_for_display(&mut snapshot);
        self.events = snapshot;
        self.status = SyncStatus::Synced;
    }

    /// Record that this instance just wrote: its state is now stamped `at`
    /// and the poll path must not re-load its own write.
    pub fn note_local_write(&mut self, at: DateTime<Utc>) {
        self.last_update = at;
        self.last_checked = at;
        self.status = SyncStatus::Synced;
    }

    /// Poll path: given the mirror's current stamp, decide whether another
    /// same-device writer has produced state this instance has not seen.
    pub fn observe_mirror_timestamp(&mut self, mirror_stamp: DateTime<Utc>) -> bool {
        if mirror_stamp > self.last_checked {
            self.status = SyncStatus::Syncing;
            self.last_checked = mirror_stamp;
            true
        } else {
            false
        }
    }

    /// Load state read back from the mirror after the poll path asked for
    /// a reload.
    pub fn apply_mirror_state(&mut self, events: Vec<CalendarEntry>, stamp: DateTime<Utc>) {
        let mut events = events;
        sort_for_display(&mut events);
        self.events = events;
        self.last_update = stamp;
        self.last_checked = stamp;
        self.status = SyncStatus::Synced;
    }

    /// Handle one message from the broadcast channel, returning the reply
    /// to send back, if any.
    ///
    /// Own-session messages are dropped. A foreign `Request` is answered
    /// with this instance's full state. A foreign `Update` replaces local
    /// state iff its timestamp is strictly greater than ours; equal or
    /// older stamps leave local state untouched.
    pub fn apply_peer_message(&mut self, msg: &PeerMessage) -> Option<PeerMessage> {
        if msg.sender() == &self.session {
            return None;
        }
        match msg {
            PeerMessage::Request { .. } => Some(PeerMessage::Update {
                session: self.session.clone(),
                events: self.events.clone(),
                timestamp: self.last_update,
            }),
            PeerMessage::Update {
                events, timestamp, ..
            } => {
                if *timestamp > self.last_update {
                    let mut incoming = events.clone();
                    sort_for_display(&mut incoming);
                    self.events = incoming;
                    self.last_update = *timestamp;
                    self.last_checked = *timestamp;
                    self.status = SyncStatus::Synced;
                }
                None
            }
        }
    }

    /// The broadcast every local mutation is followed by.
    pub fn broadcast_update(&self) -> PeerMessage {
        PeerMessage::Update {
            session: self.session.clone(),
            events: self.events.clone(),
            timestamp: self.last_update,
        }
    }

    /// The hello a freshly loaded instance broadcasts.
    pub fn broadcast_request(&self) -> PeerMessage {
        PeerMessage::Request {
            session: self.session.clone(),
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{EntryKind, AVAILABLE_COLOR};
    use chrono::{Duration, NaiveDate};

    fn entry(id: &str, date: u32, start: &str) -> CalendarEntry {
        let now = Utc::now();
        CalendarEntry {
            id: id.into(),
            title: format!("Entry {id}"),
            start_time: start.parse().unwrap(),
            end_time: "17:00".parse().unwrap(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, date).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, date).unwrap(),
            color: AVAILABLE_COLOR.into(),
            kind: EntryKind::AvailableBlock,
            client_info: None,
            created_at: now,
            last_updated: now,
        }
    }

    #[test]
    fn snapshot_is_sorted_by_date_then_start_hour() {
        let mut r = Reconciler::new();
        r.apply_remote_snapshot(vec![
            entry("c", 4, "09:00"),
            entry("b", 3, "14:00"),
            entry("a", 3, "09:00"),
        ]);
        let ids: Vec<&str> = r.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(r.status(), SyncStatus::Synced);
    }

    #[test]
    fn selection_reads_through_refreshed_snapshot() {
        let mut r = Reconciler::new();
        r.apply_remote_snapshot(vec![entry("a", 3, "09:00")]);
        r.select("a");

        let mut refreshed = entry("a", 3, "09:00");
        refreshed.title = "Renamed".into();
        r.apply_remote_snapshot(vec![refreshed]);

        assert_eq!(r.selected_entry().unwrap().title, "Renamed");
    }

    #[test]
    fn selection_of_vanished_entry_resolves_to_none() {
        let mut r = Reconciler::new();
        r.apply_remote_snapshot(vec![entry("a", 3, "09:00")]);
        r.select("a");
        r.apply_remote_snapshot(Vec::new());
        assert!(r.selected_entry().is_none());
    }

    #[test]
    fn peer_update_applies_iff_strictly_newer() {
        let mut r = Reconciler::new();
        let base = r.last_update();
        let other = SessionId::generate();

        // Older: ignored.
        r.apply_peer_message(&PeerMessage::Update {
            session: other.clone(),
            events: vec![entry("old", 3, "09:00")],
            timestamp: base - Duration::seconds(5),
        });
        assert!(r.events().is_empty());

        // Equal: ignored.
        r.apply_peer_message(&PeerMessage::Update {
            session: other.clone(),
            events: vec![entry("same", 3, "09:00")],
            timestamp: base,
        });
        assert!(r.events().is_empty());

        // Strictly newer: replaces.
        let newer = base + Duration::seconds(5);
        r.apply_peer_message(&PeerMessage::Update {
            session: other,
            events: vec![entry("new", 3, "09:00")],
            timestamp: newer,
        });
        assert_eq!(r.events().len(), 1);
        assert_eq!(r.events()[0].id, "new");
        assert_eq!(r.last_update(), newer);
    }

    #[test]
    fn own_messages_are_ignored() {
        let mut r = Reconciler::new();
        let own_update = PeerMessage::Update {
            session: r.session().clone(),
            events: vec![entry("x", 3, "09:00")],
            timestamp: Utc::now() + Duration::hours(1),
        };
        assert!(r.apply_peer_message(&own_update).is_none());
        assert!(r.events().is_empty());

        let own_request = PeerMessage::Request {
            session: r.session().clone(),
        };
        assert!(r.apply_peer_message(&own_request).is_none());
    }

    #[test]
    fn foreign_request_gets_full_state_reply() {
        let mut r = Reconciler::new();
        r.apply_remote_snapshot(vec![entry("a", 3, "09:00")]);
        let reply = r
            .apply_peer_message(&PeerMessage::Request {
                session: SessionId::generate(),
            })
            .expect("request should be answered");
        match reply {
            PeerMessage::Update { session, events, .. } => {
                assert_eq!(&session, r.session());
                assert_eq!(events.len(), 1);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn mirror_poll_triggers_once_per_stamp() {
        let mut r = Reconciler::new();
        let newer = Utc::now() + Duration::seconds(10);
        assert!(r.observe_mirror_timestamp(newer));
        assert_eq!(r.status(), SyncStatus::Syncing);
        // Same stamp again: already processed.
        assert!(!r.observe_mirror_timestamp(newer));
    }

    #[test]
    fn own_write_is_not_re_loaded_by_poll() {
        let mut r = Reconciler::new();
        let stamp = Utc::now() + Duration::seconds(1);
        r.note_local_write(stamp);
        assert!(!r.observe_mirror_timestamp(stamp));
    }

    #[test]
    fn error_status_clears_on_next_snapshot() {
        let mut r = Reconciler::new();
        r.mark_error();
        assert_eq!(r.status(), SyncStatus::Error);
        r.apply_remote_snapshot(Vec::new());
        assert_eq!(r.status(), SyncStatus::Synced);
    }
}
