//! JSON import and export of the entry list.
//!
//! Export is a pretty-printed dump of the current in-memory list. Import
//! accepts entry-shaped objects with optional bookkeeping fields: missing
//! timestamps default to now, a missing color is drawn from the palette,
//! and every entry is written individually with a fresh `lastUpdated`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::calendar::{
    random_color, CalendarEntry, ClientInfo, ClockTime, EntryDraft, EntryKind,
};
use crate::error::Result;
use crate::store::EventStore;

/// Suggested download name for an export produced today.
pub fn export_file_name(today: NaiveDate) -> String {
    format!("calendar-events-{}.json", today.format("%Y-%m-%d"))
}

/// Serialize the given list, pretty-printed.
pub fn export_events(events: &[CalendarEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// An imported object: entry-shaped, with the fields the importer
/// defaults left optional. `id` is accepted and discarded; the store
/// assigns fresh ids.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedEntry {
    #[serde(default)]
    #[allow(dead_code)]
    id: Option<String>,
    title: String,
    start_time: ClockTime,
    end_time: ClockTime,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default)]
    color: Option<String>,
    #[serde(rename = "type")]
    kind: EntryKind,
    #[serde(default)]
    client_info: Option<ClientInfo>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Parse a JSON array of entries and write each one to the store.
///
/// Returns the entries as created. A parse failure writes nothing; a
/// store failure partway through leaves the earlier writes in place, the
/// way the original's per-document import loop did.
pub fn import_events<S: EventStore + ?Sized>(
    store: &S,
    json: &str,
) -> Result<Vec<CalendarEntry>> {
    let imported: Vec<ImportedEntry> = serde_json::from_str(json)?;

    let mut created = Vec::with_capacity(imported.len());
    for entry in imported {
        let now = Utc::now();
        let draft = EntryDraft {
            title: entry.title,
            start_time: entry.start_time,
            end_time: entry.end_time,
            start_date: entry.start_date,
            end_date: entry.end_date,
            color: entry.color.unwrap_or_else(random_color),
            kind: entry.kind,
            client_info: entry.client_info,
            created_at: entry.created_at.unwrap_or(now),
            last_updated: now,
        };
        created.push(store.create(draft)?);
    }
    Ok(created)
}
