//! Upstream connection errors.

use thiserror::Error;

/// Errors surfaced by a [`MessageSource`](crate::MessageSource).
///
/// All of them are recoverable by reconnecting.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Connection closed by upstream")]
    Closed,

    #[error("Close failed: {0}")]
    Close(String),
}
