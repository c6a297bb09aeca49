//! Per-device persisted mirror of the entry list.
//!
//! Holds the three keys same-device peers coordinate through: the full
//! serialized entry list, an ISO-8601 last-update timestamp, and a
//! monotonically incrementing write counter. The counter is diagnostic
//! only; conflict resolution uses the timestamp.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEntry;
use crate::error::{CoreError, StoreError};

const MIRROR_FILE: &str = "mirror.json";

/// The persisted mirror document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorState {
    pub events: Vec<CalendarEntry>,
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub sync_counter: u64,
}

/// File-backed mirror in a fixed directory.
pub struct LocalMirror {
    path: PathBuf,
}

impl LocalMirror {
    /// Mirror stored under the default data directory.
    pub fn open() -> Result<Self, CoreError> {
        Ok(Self::at(&super::data_dir()?))
    }

    /// Mirror stored under an explicit directory.
    pub fn at(dir: &Path) -> Self {
        Self {
            path: dir.join(MIRROR_FILE),
        }
    }

    /// Read the mirror, if one has been written.
    ///
    /// A missing file is `Ok(None)`. A malformed file is a parse error;
    /// the caller's in-memory state stays untouched.
    pub fn load(&self) -> Result<Option<MirrorState>, CoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::MirrorIo {
                    path: self.path.clone(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        let state: MirrorState = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    /// The last-update timestamp alone, used by the poll path.
    pub fn last_update(&self) -> Result<Option<DateTime<Utc>>, CoreError> {
        Ok(self.load()?.map(|s| s.last_update))
    }

    /// Persist the given list, stamping a fresh timestamp and bumping the
    /// write counter. Returns the stamped timestamp.
    pub fn save(&self, events: &[CalendarEntry]) -> Result<DateTime<Utc>, CoreError> {
        let counter = match self.load() {
            Ok(Some(prev)) => prev.sync_counter + 1,
            // A corrupt mirror is overwritten rather than propagated; the
            // save path is how it heals.
            _ => 1,
        };
        let state = MirrorState {
            events: events.to_vec(),
            last_update: Utc::now(),
            sync_counter: counter,
        };
        let content = serde_json::to_string_pretty(&state)?;
        std::fs::write(&self.path, content).map_err(|e| StoreError::MirrorIo {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(state.last_update)
    }
}
