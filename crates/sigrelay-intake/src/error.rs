//! Frame decoding errors.

use thiserror::Error;

/// A frame that does not decode into a message.
///
/// Only the rest of the offending frame is skipped; the reader keeps going.
#[derive(Debug, Error)]
#[error("Decode failed at byte {offset}: {source}")]
pub struct DecodeError {
    pub offset: usize,
    #[source]
    pub source: serde_json::Error,
}
