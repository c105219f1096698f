//! Error types for the upnext ecosystem.

use thiserror::Error;

/// Errors that can occur in upnext operations.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid title replacement rule '{rule}': {message}")]
    TitleRule { rule: String, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for upnext operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
