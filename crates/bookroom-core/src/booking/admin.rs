//! Administrator-only operations: the login gate, availability
//! definition, and collection seeding.

use chrono::{NaiveDate, Utc};

use crate::calendar::{
    CalendarEntry, ClientInfo, ClockTime, EntryDraft, EntryKind, AVAILABLE_COLOR, BOOKED_COLOR,
};
use crate::error::{Result, ValidationError};
use crate::store::EventStore;

/// Client-side shared-secret gate.
///
/// Comparison is case-sensitive and unlimited; this is observable
/// behavior, not a security boundary.
#[derive(Debug, Clone)]
pub struct AdminGate {
    password: String,
}

impl AdminGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    pub fn login(&self, supplied: &str) -> bool {
        supplied == self.password
    }
}

/// What the administrator fills in to define an availability block.
#[derive(Debug, Clone)]
pub struct AvailabilityRequest {
    pub title: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AvailabilityRequest {
    /// Validate and turn into a draft ready for the store.
    ///
    /// Empty title (after trimming) and `end_date < start_date` are
    /// rejected; a block whose hours never produce a slot is allowed, it
    /// simply offers nothing.
    pub fn into_draft(self) -> Result<EntryDraft, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::DateOrder {
                start: self.start_date,
                end: self.end_date,
            });
        }
        let now = Utc::now();
        Ok(EntryDraft {
            title,
            start_time: self.start_time,
            end_time: self.end_time,
            start_date: self.start_date,
            end_date: self.end_date,
            color: AVAILABLE_COLOR.into(),
            kind: EntryKind::AvailableBlock,
            client_info: None,
            created_at: now,
            last_updated: now,
        })
    }
}

/// Validate and persist an availability block.
pub fn define_availability<S: EventStore + ?Sized>(
    store: &S,
    request: AvailabilityRequest,
) -> Result<CalendarEntry> {
    let draft = request.into_draft()?;
    Ok(store.create(draft)?)
}

/// Populate the example entries the page ships with when the collection
/// is empty: one availability block and one booking.
pub fn seed_example_entries<S: EventStore + ?Sized>(store: &S) -> Result<Vec<CalendarEntry>> {
    let now = Utc::now();
    let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap_or_else(|| Utc::now().date_naive());

    let available = EntryDraft {
        title: "Program Disponibil".into(),
        start_time: ClockTime::on_hour(9),
        end_time: ClockTime::on_hour(17),
        start_date: date,
        end_date: date,
        color: AVAILABLE_COLOR.into(),
        kind: EntryKind::AvailableBlock,
        client_info: None,
        created_at: now,
        last_updated: now,
    };
    let booked = EntryDraft {
        title: "Programare: John Doe".into(),
        start_time: ClockTime::on_hour(14),
        end_time: ClockTime::on_hour(15),
        start_date: date,
        end_date: date,
        color: BOOKED_COLOR.into(),
        kind: EntryKind::Booked,
        client_info: Some(ClientInfo {
            first_name: "John".into(),
            last_name: "Doe".into(),
            phone: "0712345678".into(),
        }),
        created_at: now,
        last_updated: now,
    };

    Ok(vec![store.create(available)?, store.create(booked)?])
}
