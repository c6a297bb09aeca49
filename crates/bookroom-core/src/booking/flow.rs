//! Client booking state machine.
//!
//! `Idle -> SlotSelection -> FormEntry -> commit`, with cancellation from
//! any state. Nothing touches the store until commit, so cancellation is
//! pure local discard.

use chrono::Utc;

use crate::availability::generate_slots;
use crate::calendar::{
    CalendarEntry, ClientInfo, EntryDraft, EntryKind, TimeSlot, BOOKED_COLOR,
};
use crate::error::{Result, ValidationError};
use crate::store::EventStore;

/// Who is driving the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Admin,
    Client,
}

/// Contact fields the client submits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl BookingForm {
    /// All three fields required, judged after trimming.
    pub fn validate(&self) -> Result<ClientInfo, ValidationError> {
        let require = |value: &str, field: &'static str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(ValidationError::EmptyField(field))
            } else {
                Ok(trimmed.to_string())
            }
        };
        Ok(ClientInfo {
            first_name: require(&self.first_name, "firstName")?,
            last_name: require(&self.last_name, "lastName")?,
            phone: require(&self.phone, "phone")?,
        })
    }
}

/// Where the workflow currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Idle,
    /// A client opened an availability block; slots are on display.
    SlotSelection {
        block: CalendarEntry,
        slots: Vec<TimeSlot>,
    },
    /// An administrator opened an entry; details are on display, no slots.
    ViewingDetails { entry: CalendarEntry },
    /// A slot was picked; the contact form is open.
    FormEntry { slot: TimeSlot },
}

/// The booking lifecycle for one user interaction at a time.
#[derive(Debug, Default)]
pub struct BookingFlow {
    state: FlowState,
}

impl Default for FlowState {
    fn default() -> Self {
        FlowState::Idle
    }
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// An entry was clicked.
    ///
    /// Clients opening an availability block get slots computed against
    /// the current entry list; administrators always get the details view.
    /// Anything else (a client clicking a booked or regular entry) also
    /// opens details, matching the original page.
    pub fn open_entry(&mut self, actor: Actor, entry: &CalendarEntry, entries: &[CalendarEntry]) {
        if actor == Actor::Client && entry.is_available_block() {
            self.state = FlowState::SlotSelection {
                slots: generate_slots(entry, entries),
                block: entry.clone(),
            };
        } else {
            self.state = FlowState::ViewingDetails {
                entry: entry.clone(),
            };
        }
    }

    /// Recompute displayed slots after a fresh snapshot arrived.
    pub fn refresh_slots(&mut self, entries: &[CalendarEntry]) {
        if let FlowState::SlotSelection { block, slots } = &mut self.state {
            *slots = generate_slots(block, entries);
        }
    }

    /// The client picked a slot; any open details view closes.
    pub fn pick_slot(&mut self, slot: TimeSlot) -> Result<(), ValidationError> {
        match &self.state {
            FlowState::SlotSelection { .. } => {
                self.state = FlowState::FormEntry { slot };
                Ok(())
            }
            _ => Err(ValidationError::InvalidState(
                "no slot selection in progress",
            )),
        }
    }

    /// Commit the booking: validate the form, write one booked entry with
    /// the slot's times and dates copied verbatim, reset to idle.
    ///
    /// On validation failure the form stays open (state unchanged) and
    /// nothing is written.
    ///
    /// Two clients can commit the same hour if neither saw the other's
    /// write before submitting; there is no conditional-write guard, so
    /// double-booking is possible and resolved by the administrator.
    pub fn submit<S: EventStore + ?Sized>(
        &mut self,
        form: &BookingForm,
        store: &S,
    ) -> Result<CalendarEntry> {
        let slot = match &self.state {
            FlowState::FormEntry { slot } => slot.clone(),
            _ => return Err(ValidationError::InvalidState("no booking form open").into()),
        };
        let client = form.validate()?;

        let now = Utc::now();
        let draft = EntryDraft {
            title: format!("Programare: {} {}", client.first_name, client.last_name),
            start_time: slot.start_time,
            end_time: slot.end_time,
            start_date: slot.start_date,
            end_date: slot.end_date,
            color: BOOKED_COLOR.into(),
            kind: EntryKind::Booked,
            client_info: Some(client),
            created_at: now,
            last_updated: now,
        };
        let created = store.create(draft)?;
        self.state = FlowState::Idle;
        Ok(created)
    }

    /// Discard whatever is in progress. Never touches the store.
    pub fn cancel(&mut self) {
        self.state = FlowState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::AVAILABLE_COLOR;
    use crate::store::SqliteStore;
    use chrono::NaiveDate;

    fn block() -> CalendarEntry {
        let now = Utc::now();
        CalendarEntry {
            id: "block-1".into(),
            title: "Program Disponibil".into(),
            start_time: "09:00".parse().unwrap(),
            end_time: "12:00".parse().unwrap(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            color: AVAILABLE_COLOR.into(),
            kind: EntryKind::AvailableBlock,
            client_info: None,
            created_at: now,
            last_updated: now,
        }
    }

    fn form() -> BookingForm {
        BookingForm {
            first_name: "Ana".into(),
            last_name: "Pop".into(),
            phone: "0711111111".into(),
        }
    }

    #[test]
    fn client_opening_block_gets_slots() {
        let b = block();
        let mut flow = BookingFlow::new();
        flow.open_entry(Actor::Client, &b, std::slice::from_ref(&b));
        match flow.state() {
            FlowState::SlotSelection { slots, .. } => assert_eq!(slots.len(), 3),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn admin_opening_block_gets_details() {
        let b = block();
        let mut flow = BookingFlow::new();
        flow.open_entry(Actor::Admin, &b, std::slice::from_ref(&b));
        assert!(matches!(flow.state(), FlowState::ViewingDetails { .. }));
    }

    #[test]
    fn full_booking_path_writes_one_entry() {
        let store = SqliteStore::open_memory().unwrap();
        let b = block();
        let mut flow = BookingFlow::new();
        flow.open_entry(Actor::Client, &b, std::slice::from_ref(&b));

        let slot = match flow.state() {
            FlowState::SlotSelection { slots, .. } => slots[0].clone(),
            other => panic!("unexpected state: {other:?}"),
        };
        flow.pick_slot(slot.clone()).unwrap();

        let created = flow.submit(&form(), &store).unwrap();
        assert_eq!(created.kind, EntryKind::Booked);
        assert_eq!(created.start_time, slot.start_time);
        assert_eq!(created.end_time, slot.end_time);
        assert_eq!(created.start_date, slot.start_date);
        assert_eq!(created.title, "Programare: Ana Pop");
        let info = created.client_info.unwrap();
        assert_eq!(info.phone, "0711111111");

        assert_eq!(store.list().unwrap().len(), 1);
        assert!(matches!(flow.state(), FlowState::Idle));
    }

    #[test]
    fn empty_phone_fails_validation_and_keeps_form_open() {
        let store = SqliteStore::open_memory().unwrap();
        let b = block();
        let mut flow = BookingFlow::new();
        flow.open_entry(Actor::Client, &b, std::slice::from_ref(&b));
        let slot = match flow.state() {
            FlowState::SlotSelection { slots, .. } => slots[0].clone(),
            other => panic!("unexpected state: {other:?}"),
        };
        flow.pick_slot(slot).unwrap();

        let mut bad = form();
        bad.phone = "   ".into();
        let err = flow.submit(&bad, &store).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Validation(ValidationError::EmptyField("phone"))
        ));
        // Form stays open, nothing written.
        assert!(matches!(flow.state(), FlowState::FormEntry { .. }));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn fields_are_trimmed_before_storage() {
        let store = SqliteStore::open_memory().unwrap();
        let b = block();
        let mut flow = BookingFlow::new();
        flow.open_entry(Actor::Client, &b, std::slice::from_ref(&b));
        let slot = match flow.state() {
            FlowState::SlotSelection { slots, .. } => slots[0].clone(),
            other => panic!("unexpected state: {other:?}"),
        };
        flow.pick_slot(slot).unwrap();

        let padded = BookingForm {
            first_name: "  Ana ".into(),
            last_name: " Pop  ".into(),
            phone: " 0711111111 ".into(),
        };
        let created = flow.submit(&padded, &store).unwrap();
        let info = created.client_info.unwrap();
        assert_eq!(info.first_name, "Ana");
        assert_eq!(info.last_name, "Pop");
        assert_eq!(info.phone, "0711111111");
    }

    #[test]
    fn cancel_discards_progress_without_store_mutation() {
        let store = SqliteStore::open_memory().unwrap();
        let b = block();
        let mut flow = BookingFlow::new();
        flow.open_entry(Actor::Client, &b, std::slice::from_ref(&b));
        flow.cancel();
        assert!(matches!(flow.state(), FlowState::Idle));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn pick_slot_outside_selection_is_rejected() {
        let mut flow = BookingFlow::new();
        let b = block();
        let slot = generate_slots(&b, &[]).remove(0);
        assert!(flow.pick_slot(slot).is_err());
    }

    #[test]
    fn refresh_drops_newly_booked_slot() {
        let b = block();
        let mut flow = BookingFlow::new();
        flow.open_entry(Actor::Client, &b, std::slice::from_ref(&b));

        // Someone else books 10:00 while the list is on screen.
        let now = Utc::now();
        let foreign = CalendarEntry {
            id: "booked-1".into(),
            title: "Programare: John Doe".into(),
            start_time: "10:00".parse().unwrap(),
            end_time: "11:00".parse().unwrap(),
            start_date: b.start_date,
            end_date: b.start_date,
            color: crate::calendar::BOOKED_COLOR.into(),
            kind: EntryKind::Booked,
            client_info: Some(ClientInfo {
                first_name: "John".into(),
                last_name: "Doe".into(),
                phone: "0712345678".into(),
            }),
            created_at: now,
            last_updated: now,
        };
        flow.refresh_slots(&[b.clone(), foreign]);
        match flow.state() {
            FlowState::SlotSelection { slots, .. } => {
                assert_eq!(slots.len(), 2);
                assert!(slots.iter().all(|s| s.start_time.hour() != 10));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }
}
