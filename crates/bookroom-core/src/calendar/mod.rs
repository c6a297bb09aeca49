//! Calendar data model.
//!
//! `CalendarEntry` is the single persisted document type: administrator
//! availability blocks, client bookings, and plain events are all entries
//! distinguished by [`EntryKind`]. Field names and kind discriminators
//! follow the persisted document format (camelCase, `"admin-available"` /
//! `"booked"` / `"regular"`).

mod clock;

pub use clock::ClockTime;

use chrono::{DateTime, NaiveDate, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Display color tags, not semantically meaningful to the core.
pub const COLOR_PALETTE: [&str; 7] = [
    "bg-blue-500",
    "bg-green-500",
    "bg-purple-500",
    "bg-yellow-500",
    "bg-red-500",
    "bg-indigo-500",
    "bg-pink-500",
];

/// Color given to administrator availability blocks.
pub const AVAILABLE_COLOR: &str = "bg-green-500";

/// Color given to confirmed bookings.
pub const BOOKED_COLOR: &str = "bg-purple-500";

/// Pick a color from the fixed palette at random.
///
/// Used when imported entries arrive without one.
pub fn random_color() -> String {
    let mut rng = rand::thread_rng();
    COLOR_PALETTE
        .choose(&mut rng)
        .unwrap_or(&COLOR_PALETTE[0])
        .to_string()
}

/// Closed set of entry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Administrator-defined span of bookable time.
    #[serde(rename = "admin-available")]
    AvailableBlock,
    /// A confirmed client reservation.
    #[serde(rename = "booked")]
    Booked,
    /// An ordinary calendar event, neither bookable nor booked.
    #[serde(rename = "regular")]
    Regular,
}

/// Contact details captured at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// A persisted calendar entry.
///
/// `client_info` is present if and only if `kind == Booked`; the write
/// paths in the booking workflow maintain this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    /// Opaque unique identifier, assigned by the store at creation.
    pub id: String,
    pub title: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub start_date: NaiveDate,
    /// Always `>= start_date`; enforced at creation.
    pub end_date: NaiveDate,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_info: Option<ClientInfo>,
    pub created_at: DateTime<Utc>,
    /// Touched on every mutation; used purely for recency comparison.
    pub last_updated: DateTime<Utc>,
}

impl CalendarEntry {
    /// Whether this entry covers the given calendar date.
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_available_block(&self) -> bool {
        self.kind == EntryKind::AvailableBlock
    }

    pub fn is_booked(&self) -> bool {
        self.kind == EntryKind::Booked
    }
}

/// A `CalendarEntry` waiting for the store to assign its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub title: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_info: Option<ClientInfo>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl EntryDraft {
    /// Attach a store-assigned id.
    pub fn into_entry(self, id: String) -> CalendarEntry {
        CalendarEntry {
            id,
            title: self.title,
            start_time: self.start_time,
            end_time: self.end_time,
            start_date: self.start_date,
            end_date: self.end_date,
            color: self.color,
            kind: self.kind,
            client_info: self.client_info,
            created_at: self.created_at,
            last_updated: self.last_updated,
        }
    }
}

/// An ephemeral one-hour bookable candidate derived from an
/// [`EntryKind::AvailableBlock`] entry. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Id of the `AvailableBlock` this slot was generated from.
    pub parent_id: String,
}
