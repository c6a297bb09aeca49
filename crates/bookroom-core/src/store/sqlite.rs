//! SQLite-backed implementation of the shared events collection.
//!
//! Stands in for the remote document store: documents are rows, the change
//! feed re-reads the collection and fans the snapshot out to subscribers
//! after every mutation.

use std::sync::mpsc;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{data_dir, EventStore, Snapshot};
use crate::calendar::{CalendarEntry, ClientInfo, EntryDraft, EntryKind};
use crate::error::StoreError;

/// Parse entry kind from its stored discriminator.
fn parse_kind(kind_str: &str) -> EntryKind {
    match kind_str {
        "admin-available" => EntryKind::AvailableBlock,
        "booked" => EntryKind::Booked,
        _ => EntryKind::Regular,
    }
}

/// Format entry kind for storage.
fn format_kind(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::AvailableBlock => "admin-available",
        EntryKind::Booked => "booked",
        EntryKind::Regular => "regular",
    }
}

/// Parse datetime from RFC 3339 with fallback to current time.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored text column into its typed form.
fn decode<T: std::str::FromStr>(
    idx: usize,
    what: &str,
    value: String,
) -> Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("invalid {what}: {value}").into(),
        )
    })
}

/// Build a CalendarEntry from a database row.
fn row_to_entry(row: &rusqlite::Row) -> Result<CalendarEntry, rusqlite::Error> {
    let kind_str: String = row.get(7)?;
    let first_name: Option<String> = row.get(8)?;
    let last_name: Option<String> = row.get(9)?;
    let phone: Option<String> = row.get(10)?;
    let client_info = match (first_name, last_name, phone) {
        (Some(first_name), Some(last_name), Some(phone)) => Some(ClientInfo {
            first_name,
            last_name,
            phone,
        }),
        _ => None,
    };

    let created_at: String = row.get(11)?;
    let last_updated: String = row.get(12)?;

    Ok(CalendarEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        start_time: decode(2, "start time", row.get(2)?)?,
        end_time: decode(3, "end time", row.get(3)?)?,
        start_date: decode(4, "start date", row.get(4)?)?,
        end_date: decode(5, "end date", row.get(5)?)?,
        color: row.get(6)?,
        kind: parse_kind(&kind_str),
        client_info,
        created_at: parse_datetime_fallback(&created_at),
        last_updated: parse_datetime_fallback(&last_updated),
    })
}

/// The shared events collection, one row per entry.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    subscribers: Mutex<Vec<mpsc::Sender<Snapshot>>>,
}

impl SqliteStore {
    /// Open (or create) the events database under the data directory.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("events.db");
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store. Used by tests and by callers that want a
    /// throwaway collection.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                color TEXT NOT NULL,
                kind TEXT NOT NULL,
                client_first_name TEXT,
                client_last_name TEXT,
                client_phone TEXT,
                created_at TEXT NOT NULL,
                last_updated TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Whether the collection holds no entries at all.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Locked)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count == 0)
    }

    /// Re-read the collection and deliver it to every live subscriber,
    /// dropping the ones that went away.
    fn notify_subscribers(&self) {
        let snapshot = self.list();
        let mut subs = match self.subscribers.lock() {
            Ok(subs) => subs,
            Err(_) => return,
        };
        subs.retain(|tx| {
            let payload = match &snapshot {
                Ok(entries) => Ok(entries.clone()),
                Err(e) => Err(StoreError::QueryFailed(e.to_string())),
            };
            tx.send(payload).is_ok()
        });
    }
}

impl EventStore for SqliteStore {
    fn create(&self, draft: EntryDraft) -> Result<CalendarEntry, StoreError> {
        let id = Uuid::new_v4().to_string();
        {
            let conn = self.conn.lock().map_err(|_| StoreError::Locked)?;
            conn.execute(
                "INSERT INTO events (
                    id, title, start_time, end_time, start_date, end_date,
                    color, kind, client_first_name, client_last_name,
                    client_phone, created_at, last_updated
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    id,
                    draft.title,
                    draft.start_time.to_string(),
                    draft.end_time.to_string(),
                    draft.start_date.to_string(),
                    draft.end_date.to_string(),
                    draft.color,
                    format_kind(draft.kind),
                    draft.client_info.as_ref().map(|c| c.first_name.clone()),
                    draft.client_info.as_ref().map(|c| c.last_name.clone()),
                    draft.client_info.as_ref().map(|c| c.phone.clone()),
                    draft.created_at.to_rfc3339(),
                    draft.last_updated.to_rfc3339(),
                ],
            )?;
        }
        self.notify_subscribers();
        Ok(draft.into_entry(id))
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let changed = {
            let conn = self.conn.lock().map_err(|_| StoreError::Locked)?;
            conn.execute("DELETE FROM events WHERE id = ?1", params![id])?
        };
        if changed > 0 {
            self.notify_subscribers();
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<CalendarEntry>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Locked)?;
        let mut stmt = conn.prepare(
            "SELECT id, title, start_time, end_time, start_date, end_date,
                    color, kind, client_first_name, client_last_name,
                    client_phone, created_at, last_updated
             FROM events ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], row_to_entry)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    fn subscribe(&self) -> mpsc::Receiver<Snapshot> {
        let (tx, rx) = mpsc::channel();
        // Deliver the current state immediately, like a live query that
        // fires once on attach.
        let initial = self.list();
        let _ = tx.send(initial);
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }
}
