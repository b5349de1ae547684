//! Subscribers for newly accepted messages.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::NotifyError;
use crate::message::Message;
use crate::message_type::MessageType;

/// Event emitted after a message has been enqueued.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    #[serde(rename = "content")]
    pub message: Message,
    pub types: Vec<MessageType>,
}

impl NewMessage {
    pub fn new(message: Message, types: Vec<MessageType>) -> Self {
        Self { message, types }
    }
}

/// Receives [`NewMessage`] events.
///
/// Observers run off the intake path; an error is logged by the dispatcher
/// and never reaches the upstream reader.
#[async_trait]
pub trait MessageObserver: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn on_message(&self, event: &NewMessage) -> Result<(), NotifyError>;
}
