//! Core types for calendar synchronization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::CalendarEntry;

/// Sync state surfaced to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Synced,
    Syncing,
    Error,
}

/// Random identity generated once per page load.
///
/// Peers use it to tell their own broadcasts from everyone else's; it is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Messages exchanged over the same-device broadcast channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeerMessage {
    /// A newly loaded peer asking whoever is around for their state.
    Request { session: SessionId },
    /// Full event list plus the timestamp it was stamped with.
    Update {
        session: SessionId,
        events: Vec<CalendarEntry>,
        timestamp: DateTime<Utc>,
    },
}

impl PeerMessage {
    /// The session that sent this message.
    pub fn sender(&self) -> &SessionId {
        match self {
            PeerMessage::Request { session } => session,
            PeerMessage::Update { session, .. } => session,
        }
    }
}
