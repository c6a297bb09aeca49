//! JSON import and export of the entry list.

use std::path::PathBuf;

use bookroom_core::store::EventStore;
use bookroom_core::{export_events, export_file_name, import_events, SqliteStore};
use chrono::Utc;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum TransferAction {
    /// Export all entries to a JSON file
    Export {
        /// Output file, defaults to calendar-events-<today>.json
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import entries from a JSON file
    Import {
        /// Input file
        input: PathBuf,
    },
}

pub fn run(action: TransferAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    match action {
        TransferAction::Export { output } => {
            let events = store.list()?;
            let json = export_events(&events)?;
            let path =
                output.unwrap_or_else(|| export_file_name(Utc::now().date_naive()).into());
            std::fs::write(&path, json)?;
            println!("exported {} entries to {}", events.len(), path.display());
        }
        TransferAction::Import { input } => {
            let json = std::fs::read_to_string(&input)?;
            let created = import_events(&store, &json)?;
            println!("imported {} entries", created.len());
        }
    }
    Ok(())
}
