//! Error handling for dlprefs

use thiserror::Error;

/// Main error type for dlprefs operations
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value for {key}: {detail}")]
    InvalidSetting { key: String, detail: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Cookie entry not found: {0}")]
    NotFound(String),

    #[error("Host channel error: {0}")]
    Host(String),
}

/// Result type alias for dlprefs operations
pub type Result<T> = std::result::Result<T, PrefsError>;
