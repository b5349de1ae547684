//! Message type parse errors.

use thiserror::Error;

/// A message type name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown message type: {0:?}")]
pub struct UnknownMessageType(pub String);
