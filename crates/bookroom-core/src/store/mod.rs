//! Event store adapter.
//!
//! Abstracts persistence of calendar entries: the shared document
//! collection ([`SqliteStore`]) and the per-device mirror
//! ([`LocalMirror`]). No calendar semantics live here.

mod mirror;
mod sqlite;

pub use mirror::{LocalMirror, MirrorState};
pub use sqlite::SqliteStore;

use std::path::PathBuf;
use std::sync::mpsc;

use crate::calendar::{CalendarEntry, EntryDraft};
use crate::error::StoreError;

/// One emission of the store's change feed: a full snapshot of the
/// collection, or the error that interrupted it.
pub type Snapshot = Result<Vec<CalendarEntry>, StoreError>;

/// Persistence of the shared "events" collection.
///
/// Constructor-injected wherever entries are read or written; there is no
/// process-wide store singleton.
pub trait EventStore {
    /// Persist a draft; the store assigns the id.
    fn create(&self, draft: EntryDraft) -> Result<CalendarEntry, StoreError>;

    /// Remove an entry by id. Deleting an id that does not exist is a no-op.
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// All entries, in creation order (newest first).
    fn list(&self) -> Result<Vec<CalendarEntry>, StoreError>;

    /// Subscribe to the change feed. A full snapshot is delivered after
    /// every mutation for as long as the receiver is alive.
    fn subscribe(&self) -> mpsc::Receiver<Snapshot>;
}

/// Returns `~/.config/bookroom[-dev]/` based on BOOKROOM_ENV.
///
/// Set BOOKROOM_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BOOKROOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("bookroom-dev")
    } else {
        base_dir.join("bookroom")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
