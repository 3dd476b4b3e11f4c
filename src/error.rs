//! Error types for relaychat.

use thiserror::Error;

/// A draft that cannot be sent.
///
/// Detected locally before anything is emitted to the relay.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The draft has no message text.
    #[error("message required")]
    MessageRequired,

    /// Neither a target user nor a joined room is available.
    #[error("no destination: need target user or room")]
    NoDestination,

    /// A private message is missing its receiver or its text.
    #[error("receiver and message required")]
    ReceiverRequired,
}

/// Common error type for relaychat.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Draft rejected before sending.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The channel to the relay could not be established or failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// A frame could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ChatError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ChatError::Connection(e.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Protocol(e.to_string())
    }
}

/// Result type alias for relaychat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
