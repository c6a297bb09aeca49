//! Core error types for bookroom-core.
//!
//! Every failure is caught at the operation boundary: validation problems
//! stay on the form, store/transport problems surface as a sync error
//! status, nothing is fatal to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bookroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// User-supplied fields failed a required-field or date-ordering check
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Store read/write/subscribe failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed JSON on import or on reading the local mirror
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation errors.
///
/// Recovered locally: the form stays open, no store mutation is attempted.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required field is empty after trimming
    #[error("Required field '{0}' is empty")]
    EmptyField(&'static str),

    /// End date falls before start date
    #[error("End date ({end}) must not be before start date ({start})")]
    DateOrder {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Not a valid HH:MM wall-clock time
    #[error("Invalid wall-clock time '{0}', expected HH:MM")]
    InvalidClockTime(String),

    /// The workflow was asked to do something its current state forbids
    #[error("Invalid booking state: {0}")]
    InvalidState(&'static str),
}

/// Store/transport errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The store is locked by another writer
    #[error("Store is locked")]
    Locked,

    /// Local mirror file could not be read or written
    #[error("Mirror IO failed at {path}: {message}")]
    MirrorIo { path: PathBuf, message: String },

    /// A persisted row or mirror document did not decode
    #[error("Corrupt stored record: {0}")]
    CorruptRecord(String),

    /// IO failure underneath the store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
