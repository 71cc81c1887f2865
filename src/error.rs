//! Error types for Undertekst.

use std::time::Duration;
use thiserror::Error;

/// Library-level error type for caption resolution.
#[derive(Error, Debug)]
pub enum UndertekstError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not a recognizable video reference: {0}")]
    InvalidReference(String),

    #[error("Captions are disabled for video {0}")]
    CaptionsDisabled(String),

    #[error("Caption catalog unreachable: {0}")]
    CatalogUnreachable(String),

    #[error("Caption retrieval failed: {0}")]
    Retrieval(String),

    #[error("Caption payload could not be decoded: {0}")]
    Decode(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {}", format_duration(.0))]
    TimedOut(Duration),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Whole seconds when exact, else milliseconds.
fn format_duration(duration: &Duration) -> String {
    if duration.subsec_millis() == 0 && duration.as_secs() > 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Result type alias for Undertekst operations.
pub type Result<T> = std::result::Result<T, UndertekstError>;
