//! # Bookroom Core Library
//!
//! Core business logic for the Bookroom booking calendar: an
//! administrator defines blocks of available time, clients pick hour-long
//! slots within those blocks and leave contact details to reserve them.
//! The presentation layer (web page or CLI) is a thin shell over this
//! crate.
//!
//! ## Architecture
//!
//! - **Availability Engine**: pure slot generation from availability
//!   blocks and the current entry list
//! - **Synchronization Reconciler**: owns the in-memory entry list and
//!   reconciles it against store snapshots, peer broadcasts, and the
//!   mirror poll, last-write-wins by timestamp
//! - **Booking Workflow**: the `Idle -> SlotSelection -> FormEntry ->
//!   commit` state machine plus administrator operations
//! - **Event Store Adapter**: SQLite-backed shared collection and the
//!   per-device JSON mirror
//!
//! ## Key Components
//!
//! - [`generate_slots`]: the availability engine
//! - [`Reconciler`] / [`SyncSession`]: synchronization state
//! - [`BookingFlow`]: the booking state machine
//! - [`EventStore`]: persistence seam

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod config;
pub mod error;
pub mod store;
pub mod sync;
pub mod transfer;

pub use availability::generate_slots;
pub use booking::{
    define_availability, seed_example_entries, Actor, AdminGate, AvailabilityRequest,
    BookingFlow, BookingForm, FlowState,
};
pub use calendar::{CalendarEntry, ClientInfo, ClockTime, EntryDraft, EntryKind, TimeSlot};
pub use config::{Config, SyncStrategy};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use store::{EventStore, LocalMirror, SqliteStore};
pub use sync::{
    CrossTabBroadcast, PeerMessage, Reconciler, RemoteSubscription, SessionId, SyncSession,
    SyncStatus, SyncTransport, TabBus,
};
pub use transfer::{export_events, export_file_name, import_events};
