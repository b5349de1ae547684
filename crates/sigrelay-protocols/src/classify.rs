//! Message classification.

use crate::message::Message;
use crate::message_type::MessageType;

/// Map a message to the types it satisfies.
///
/// Each envelope field is evaluated independently, so a message can belong to
/// several types at once. Output follows [`MessageType::ALL`] order and is
/// empty when no relevant field is present.
pub fn classify(msg: &Message) -> Vec<MessageType> {
    let env = &msg.envelope;
    let mut types = Vec::new();

    if env.receipt_message.is_some() {
        types.push(MessageType::Receipt);
    }

    if env.typing_message.is_some() {
        types.push(MessageType::Typing);
    }

    if let Some(data) = &env.data_message {
        types.push(MessageType::Data);

        if data.message.is_some() {
            types.push(MessageType::DataMessage);
        }
    }

    if env.sync_message.is_some() {
        types.push(MessageType::Sync);
    }

    types
}

/// Whether any of `types` is in `allowed`.
pub fn is_allowed(types: &[MessageType], allowed: &[MessageType]) -> bool {
    types.iter().any(|t| allowed.contains(t))
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
