//! Semantic message types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMessageType;

/// Closed set of types a [`Message`](crate::Message) may belong to.
///
/// The string form is the canonical external representation, used in
/// configuration, logs and broker payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    /// Envelope carries receipt info.
    Receipt,
    /// Envelope carries typing info.
    Typing,
    /// Envelope carries data content.
    Data,
    /// Data content with a text body. Only ever occurs alongside [`MessageType::Data`].
    DataMessage,
    /// Envelope carries a sync marker.
    Sync,
}

impl MessageType {
    /// All types, in classification order.
    pub const ALL: [MessageType; 5] = [
        MessageType::Receipt,
        MessageType::Typing,
        MessageType::Data,
        MessageType::DataMessage,
        MessageType::Sync,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Receipt => "receipt",
            MessageType::Typing => "typing",
            MessageType::Data => "data",
            MessageType::DataMessage => "data-message",
            MessageType::Sync => "sync",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownMessageType(s.to_string()))
    }
}
