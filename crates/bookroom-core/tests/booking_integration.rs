//! Integration tests for the booking workflow end to end.
//!
//! These tests run the full path an administrator and a client would
//! take: define availability, pick a slot, submit the form, and watch
//! the change propagate through the sync layer.

use std::time::Duration;

use bookroom_core::booking::{
    define_availability, Actor, AvailabilityRequest, BookingFlow, BookingForm, FlowState,
};
use bookroom_core::store::{EventStore, LocalMirror, SqliteStore};
use bookroom_core::sync::{RemoteSubscription, SyncSession, SyncStatus};
use bookroom_core::{export_events, import_events, EntryKind};
use chrono::NaiveDate;
use tempfile::TempDir;

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn availability(day: u32, start: &str, end: &str) -> AvailabilityRequest {
    AvailabilityRequest {
        title: "Program Disponibil".into(),
        start_time: start.parse().unwrap(),
        end_time: end.parse().unwrap(),
        start_date: march(day),
        end_date: march(day),
    }
}

fn form(first: &str, last: &str, phone: &str) -> BookingForm {
    BookingForm {
        first_name: first.into(),
        last_name: last.into(),
        phone: phone.into(),
    }
}

fn session(dir: &TempDir) -> SyncSession<SqliteStore, RemoteSubscription> {
    let store = SqliteStore::open_memory().unwrap();
    let transport = RemoteSubscription::attach(
        &store,
        LocalMirror::at(dir.path()),
        Duration::from_secs(3600),
    );
    SyncSession::new(store, transport)
}

#[test]
fn admin_defines_and_client_books_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);

    // Administrator publishes a morning block.
    define_availability(session.store(), availability(3, "09:00", "12:00")).unwrap();
    session.pump().unwrap();
    assert_eq!(session.events().len(), 1);
    assert_eq!(session.status(), SyncStatus::Synced);

    // Client opens it and sees three hour slots.
    let block = session.events()[0].clone();
    let mut flow = BookingFlow::new();
    flow.open_entry(Actor::Client, &block, session.events());
    let slot = match flow.state() {
        FlowState::SlotSelection { slots, .. } => {
            assert_eq!(slots.len(), 3);
            slots[1].clone()
        }
        other => panic!("unexpected state: {other:?}"),
    };

    // Pick 10:00, fill the form, commit.
    flow.pick_slot(slot.clone()).unwrap();
    let booked = flow
        .submit(&form("Maria", "Ionescu", "0722333444"), session.store())
        .unwrap();
    assert_eq!(booked.title, "Programare: Maria Ionescu");
    assert_eq!(booked.start_time, slot.start_time);
    assert_eq!(booked.end_time, slot.end_time);
    assert!(matches!(flow.state(), FlowState::Idle));

    // The session picks up the write through its subscription.
    session.pump().unwrap();
    assert_eq!(session.events().len(), 2);
    assert_eq!(session.status(), SyncStatus::Synced);
}

#[test]
fn booked_slot_disappears_for_the_next_client() {
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);
    define_availability(session.store(), availability(3, "09:00", "12:00")).unwrap();
    session.pump().unwrap();

    let block = session.events()[0].clone();
    let mut first = BookingFlow::new();
    first.open_entry(Actor::Client, &block, session.events());
    let slot = match first.state() {
        FlowState::SlotSelection { slots, .. } => slots[0].clone(),
        other => panic!("unexpected state: {other:?}"),
    };
    first.pick_slot(slot).unwrap();
    first
        .submit(&form("Ana", "Pop", "0711111111"), session.store())
        .unwrap();
    session.pump().unwrap();

    // A second client opening the same block no longer sees 09:00.
    let mut second = BookingFlow::new();
    second.open_entry(Actor::Client, &block, session.events());
    match second.state() {
        FlowState::SlotSelection { slots, .. } => {
            assert_eq!(slots.len(), 2);
            assert!(slots.iter().all(|s| s.start_time.hour() != 9));
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[test]
fn double_booking_race_is_possible() {
    // Two clients who both saw the slot free can both commit it; nothing
    // in the write path checks for a conflicting entry.
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);
    define_availability(session.store(), availability(3, "10:00", "11:00")).unwrap();
    session.pump().unwrap();

    let block = session.events()[0].clone();
    let stale_view = session.events().to_vec();

    let mut a = BookingFlow::new();
    let mut b = BookingFlow::new();
    a.open_entry(Actor::Client, &block, &stale_view);
    b.open_entry(Actor::Client, &block, &stale_view);
    let slot_a = match a.state() {
        FlowState::SlotSelection { slots, .. } => slots[0].clone(),
        other => panic!("unexpected state: {other:?}"),
    };
    let slot_b = match b.state() {
        FlowState::SlotSelection { slots, .. } => slots[0].clone(),
        other => panic!("unexpected state: {other:?}"),
    };

    a.pick_slot(slot_a).unwrap();
    b.pick_slot(slot_b).unwrap();
    a.submit(&form("Ana", "Pop", "0711111111"), session.store())
        .unwrap();
    b.submit(&form("Ion", "Radu", "0722222222"), session.store())
        .unwrap();

    session.pump().unwrap();
    let booked: Vec<_> = session
        .events()
        .iter()
        .filter(|e| e.kind == EntryKind::Booked)
        .collect();
    assert_eq!(booked.len(), 2);
    assert_eq!(booked[0].start_time, booked[1].start_time);
}

#[test]
fn deleting_a_booking_restores_the_slot() {
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);
    define_availability(session.store(), availability(3, "09:00", "11:00")).unwrap();
    session.pump().unwrap();

    let block = session.events()[0].clone();
    let mut flow = BookingFlow::new();
    flow.open_entry(Actor::Client, &block, session.events());
    let slot = match flow.state() {
        FlowState::SlotSelection { slots, .. } => slots[0].clone(),
        other => panic!("unexpected state: {other:?}"),
    };
    flow.pick_slot(slot).unwrap();
    let booked = flow
        .submit(&form("Ana", "Pop", "0711111111"), session.store())
        .unwrap();
    session.pump().unwrap();
    assert_eq!(session.events().len(), 2);

    // Administrator removes the booking; the hour opens up again.
    session.delete_entry(&booked.id).unwrap();
    let mut again = BookingFlow::new();
    again.open_entry(Actor::Client, &block, session.events());
    match again.state() {
        FlowState::SlotSelection { slots, .. } => assert_eq!(slots.len(), 2),
        other => panic!("unexpected state: {other:?}"),
    }
}

#[test]
fn export_import_moves_bookings_between_stores() {
    let dir = TempDir::new().unwrap();
    let mut session = session(&dir);
    define_availability(session.store(), availability(3, "09:00", "12:00")).unwrap();
    session.pump().unwrap();

    let block = session.events()[0].clone();
    let mut flow = BookingFlow::new();
    flow.open_entry(Actor::Client, &block, session.events());
    let slot = match flow.state() {
        FlowState::SlotSelection { slots, .. } => slots[0].clone(),
        other => panic!("unexpected state: {other:?}"),
    };
    flow.pick_slot(slot).unwrap();
    flow.submit(&form("Ana", "Pop", "0711111111"), session.store())
        .unwrap();
    session.pump().unwrap();

    let json = export_events(session.events()).unwrap();

    let target = SqliteStore::open_memory().unwrap();
    let created = import_events(&target, &json).unwrap();
    assert_eq!(created.len(), 2);
    let listed = target.list().unwrap();
    assert!(listed.iter().any(|e| e.kind == EntryKind::AvailableBlock));
    let booking = listed
        .iter()
        .find(|e| e.kind == EntryKind::Booked)
        .unwrap();
    assert_eq!(booking.client_info.as_ref().unwrap().phone, "0711111111");
}
