//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while parsing inbound messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Message is not a JSON object")]
    NotAnObject,

    #[error("Message has no string `type` field")]
    MissingType,

    #[error("Unknown message type: {0}")]
    UnknownType(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(&'static str),
}
