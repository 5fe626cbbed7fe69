//! Error types for the skribbl game bot
//!
//! One root error wrapping a sub-error per concern, so callers can match on
//! the concern and still bubble everything up with `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Root error type for all skribbl operations
#[derive(Debug, Error)]
pub enum SkribblError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Game precondition errors
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// Chat transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Command parsing errors
    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Configuration and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

/// Errors that abort a game before any state is created
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Image unavailable at {}: {reason}", path.display())]
    ImageUnavailable { path: PathBuf, reason: String },
}

/// Chat transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// The message being edited no longer exists
    #[error("Message {0} not found or has been deleted")]
    MessageGone(u64),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Command invocation errors, surfaced to the user as chat replies
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidArgument { name: String, value: String },
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError::SendFailed(e.to_string())
    }
}

impl From<toml::de::Error> for SkribblError {
    fn from(e: toml::de::Error) -> Self {
        SkribblError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

impl From<toml::ser::Error> for SkribblError {
    fn from(e: toml::ser::Error) -> Self {
        SkribblError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

// Convenience type alias for Results
pub type SkribblResult<T> = Result<T, SkribblError>;

/// Result alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
