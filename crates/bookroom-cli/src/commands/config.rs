//! Configuration management commands.

use bookroom_core::{Config, SyncStrategy};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "sync.strategy", "sync.poll_interval_ms")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

fn strategy_name(strategy: SyncStrategy) -> &'static str {
    match strategy {
        SyncStrategy::RemoteSubscription => "remote-subscription",
        SyncStrategy::CrossTab => "cross-tab",
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            match key.as_str() {
                "sync.strategy" => println!("{}", strategy_name(config.sync.strategy)),
                "sync.poll_interval_ms" => println!("{}", config.sync.poll_interval_ms),
                "sync.enabled" => println!("{}", config.sync.enabled),
                "admin.password" => println!("{}", config.admin.password),
                _ => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default();
            match key.as_str() {
                "sync.strategy" => {
                    config.sync.strategy = match value.as_str() {
                        "remote-subscription" => SyncStrategy::RemoteSubscription,
                        "cross-tab" => SyncStrategy::CrossTab,
                        _ => {
                            eprintln!("unknown strategy: {value}");
                            std::process::exit(1);
                        }
                    };
                }
                "sync.poll_interval_ms" => config.sync.poll_interval_ms = value.parse()?,
                "sync.enabled" => config.sync.enabled = value.parse()?,
                "admin.password" => config.admin.password = value,
                _ => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load_or_default();
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
