//! Booking workflow: the client-facing state machine and the
//! administrator-only operations.

mod admin;
mod flow;

pub use admin::{define_availability, seed_example_entries, AdminGate, AvailabilityRequest};
pub use flow::{Actor, BookingFlow, BookingForm, FlowState};
