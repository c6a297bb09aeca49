//! Client booking workflow: slot listing and reservation.

use bookroom_core::booking::{Actor, BookingFlow, BookingForm, FlowState};
use bookroom_core::store::EventStore;
use bookroom_core::{generate_slots, CalendarEntry, ClockTime, SqliteStore};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum BookAction {
    /// List open slots for an availability block
    Slots {
        /// Availability block ID
        block_id: String,
    },
    /// Reserve a slot within an availability block
    Slot {
        /// Availability block ID
        block_id: String,
        /// Slot start time (HH:MM)
        #[arg(long)]
        start: ClockTime,
        /// Client first name
        #[arg(long)]
        first_name: String,
        /// Client last name
        #[arg(long)]
        last_name: String,
        /// Client phone number
        #[arg(long)]
        phone: String,
    },
}

fn find_block<'a>(events: &'a [CalendarEntry], id: &str) -> Option<&'a CalendarEntry> {
    events.iter().find(|e| e.id == id && e.is_available_block())
}

pub fn run(action: BookAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let events = store.list()?;
    match action {
        BookAction::Slots { block_id } => {
            let Some(block) = find_block(&events, &block_id) else {
                eprintln!("no availability block with id: {block_id}");
                std::process::exit(1);
            };
            let slots = generate_slots(block, &events);
            println!("{}", serde_json::to_string_pretty(&slots)?);
        }
        BookAction::Slot {
            block_id,
            start,
            first_name,
            last_name,
            phone,
        } => {
            let Some(block) = find_block(&events, &block_id) else {
                eprintln!("no availability block with id: {block_id}");
                std::process::exit(1);
            };
            let mut flow = BookingFlow::new();
            flow.open_entry(Actor::Client, block, &events);
            let slot = match flow.state() {
                FlowState::SlotSelection { slots, .. } => {
                    slots.iter().find(|s| s.start_time == start).cloned()
                }
                _ => None,
            };
            let Some(slot) = slot else {
                eprintln!("slot {start} is not available in block {block_id}");
                std::process::exit(1);
            };
            flow.pick_slot(slot)?;
            let form = BookingForm {
                first_name,
                last_name,
                phone,
            };
            let created = flow.submit(&form, &store)?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
    }
    Ok(())
}
