//! Core error types for shotclock-core.
//!
//! Most failures in Shot Clock degrade to a default instead of surfacing,
//! but the layers underneath still report precise errors; the callers
//! decide which ones to swallow.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for shotclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Audio playback errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors from the key-value store and the group collection stored in it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another process
    #[error("Database is locked")]
    Locked,

    /// Stored value could not be (de)serialized
    #[error("Malformed value under key '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value could not be parsed for the key's type
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Audio playback errors. These are logged and swallowed by the players.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Clip file is missing from the sounds directory
    #[error("Sound file not found: {0}")]
    MissingClip(PathBuf),

    /// External player could not be started
    #[error("Failed to start player '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Halting or reaping the player failed
    #[error("Failed to stop playback: {0}")]
    StopFailed(#[source] std::io::Error),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A group must keep at least one member
    #[error("Group '{0}' has no members")]
    NoMembers(String),

    /// Unknown alarm sound identifier
    #[error("Unknown alarm sound '{0}' (expected sound1, sound2 or sound3)")]
    UnknownSound(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg)
                if code.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StoreError::Locked
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
