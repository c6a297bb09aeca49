use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bookroom-cli", version, about = "Bookroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrator operations
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
    /// Calendar entry management
    Events {
        #[command(subcommand)]
        action: commands::events::EventsAction,
    },
    /// Client booking workflow
    Book {
        #[command(subcommand)]
        action: commands::book::BookAction,
    },
    /// JSON import and export
    Transfer {
        #[command(subcommand)]
        action: commands::transfer::TransferAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Admin { action } => commands::admin::run(action),
        Commands::Events { action } => commands::events::run(action),
        Commands::Book { action } => commands::book::run(action),
        Commands::Transfer { action } => commands::transfer::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
