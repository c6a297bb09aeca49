//! Calendar entry listing and removal.

use bookroom_core::store::EventStore;
use bookroom_core::SqliteStore;
use chrono::NaiveDate;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum EventsAction {
    /// List calendar entries
    List {
        /// Only entries covering this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show one entry
    Get {
        /// Entry ID
        id: String,
    },
    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },
}

pub fn run(action: EventsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    match action {
        EventsAction::List { date } => {
            let mut events = store.list()?;
            if let Some(date) = date {
                events.retain(|e| e.covers_date(date));
            }
            events.sort_by(|a, b| {
                (a.start_date, a.start_time.hour()).cmp(&(b.start_date, b.start_time.hour()))
            });
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        EventsAction::Get { id } => {
            let events = store.list()?;
            match events.iter().find(|e| e.id == id) {
                Some(entry) => println!("{}", serde_json::to_string_pretty(entry)?),
                None => {
                    eprintln!("no entry with id: {id}");
                    std::process::exit(1);
                }
            }
        }
        EventsAction::Delete { id } => {
            store.delete(&id)?;
            println!("ok");
        }
    }
    Ok(())
}
