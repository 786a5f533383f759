//! Error types for linkdeck.

use thiserror::Error;

/// Top-level result type for linkdeck operations.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Top-level error type for linkdeck.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("edit error: {0}")]
    Edit(#[from] EditError),

    #[error("link not found: {0}")]
    NotFound(String),

    #[error("invalid tag '{0}': reserved for the tag selector")]
    ReservedTag(String),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// Failures reported by a link client. Callers treat these as opaque:
/// nothing is retried and the user only sees a generic message.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no link with id '{0}'")]
    NotFound(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the row edit state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("link '{id}' is already being edited")]
    InProgress { id: String },

    #[error("no row is being edited")]
    NotEditing,

    #[error("row '{id}' is waiting for an update and cannot be changed")]
    Updating { id: String },
}
