//! Administrator commands: login check, availability definition, seeding.

use bookroom_core::booking::{
    define_availability, seed_example_entries, AdminGate, AvailabilityRequest,
};
use bookroom_core::{ClockTime, Config, SqliteStore};
use chrono::NaiveDate;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Check the administrator password
    Login {
        /// Password to check
        password: String,
    },
    /// Define an availability block
    Define {
        /// Block title
        title: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: ClockTime,
        /// End time (HH:MM)
        #[arg(long)]
        end: ClockTime,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// End date, defaults to the start date
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
    /// Seed the example entries into an empty store
    Seed,
}

pub fn run(action: AdminAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AdminAction::Login { password } => {
            let gate = AdminGate::new(Config::load_or_default().admin.password);
            if gate.login(&password) {
                println!("ok");
            } else {
                eprintln!("invalid password");
                std::process::exit(1);
            }
        }
        AdminAction::Define {
            title,
            start,
            end,
            date,
            end_date,
        } => {
            let store = SqliteStore::open()?;
            let created = define_availability(
                &store,
                AvailabilityRequest {
                    title,
                    start_time: start,
                    end_time: end,
                    start_date: date,
                    end_date: end_date.unwrap_or(date),
                },
            )?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        AdminAction::Seed => {
            let store = SqliteStore::open()?;
            if !store.is_empty()? {
                eprintln!("store is not empty; refusing to seed");
                std::process::exit(1);
            }
            let seeded = seed_example_entries(&store)?;
            println!("seeded {} entries", seeded.len());
        }
    }
    Ok(())
}
