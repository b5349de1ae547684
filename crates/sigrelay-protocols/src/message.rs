//! Message structure received from the Signal receive API.
//!
//! Field names follow the upstream JSON (camelCase). Scalars and lists that
//! are missing or `null` decode to their zero value; optional sub-payloads
//! that are absent are omitted again when the message is re-encoded.

use serde::{Deserialize, Deserializer, Serialize};

use crate::classify::classify;
use crate::message_type::MessageType;

/// A decoded message from the upstream feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    #[serde(deserialize_with = "nullable")]
    pub envelope: Envelope,
    #[serde(deserialize_with = "nullable")]
    pub account: String,
}

impl Message {
    /// Types this message belongs to. See [`classify`].
    pub fn message_types(&self) -> Vec<MessageType> {
        classify(self)
    }

    /// Types as their canonical string form, used in logs and broker payloads.
    pub fn message_type_strings(&self) -> Vec<String> {
        self.message_types()
            .iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }

    /// Text body of the data-content, if any.
    pub fn text(&self) -> Option<&str> {
        self.envelope
            .data_message
            .as_ref()
            .and_then(|d| d.message.as_deref())
    }
}

/// Timestamped event wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Envelope {
    #[serde(deserialize_with = "nullable")]
    pub source: String,
    #[serde(deserialize_with = "nullable")]
    pub source_number: String,
    #[serde(deserialize_with = "nullable")]
    pub source_uuid: String,
    #[serde(deserialize_with = "nullable")]
    pub source_name: String,
    #[serde(deserialize_with = "nullable")]
    pub source_device: i64,
    #[serde(deserialize_with = "nullable")]
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_message: Option<ReceiptMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typing_message: Option<TypingMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_message: Option<DataMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_message: Option<SyncMessage>,
}

/// Delivery/read/viewed receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptMessage {
    #[serde(deserialize_with = "nullable")]
    pub when: i64,
    #[serde(deserialize_with = "nullable")]
    pub is_delivery: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_read: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_viewed: bool,
    #[serde(deserialize_with = "nullable")]
    pub timestamps: Vec<i64>,
}

/// Typing indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypingMessage {
    #[serde(deserialize_with = "nullable")]
    pub action: String,
    #[serde(deserialize_with = "nullable")]
    pub timestamp: i64,
}

/// Data content of an envelope.
///
/// `message` is the text body. It is always serialized, as `null` when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataMessage {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: i64,
    pub message: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub expires_in_seconds: i64,
    #[serde(deserialize_with = "nullable")]
    pub view_once: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_info: Option<GroupInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub mentions: Vec<Mention>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<Sticker>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_delete: Option<RemoteDelete>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupInfo {
    #[serde(deserialize_with = "nullable")]
    pub group_id: String,
    #[serde(deserialize_with = "nullable")]
    pub group_name: String,
    #[serde(deserialize_with = "nullable")]
    pub revision: i64,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quote {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub author: String,
    #[serde(deserialize_with = "nullable")]
    pub author_number: String,
    #[serde(deserialize_with = "nullable")]
    pub author_uuid: String,
    #[serde(deserialize_with = "nullable")]
    pub text: String,
    #[serde(deserialize_with = "nullable")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mention {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub number: String,
    #[serde(deserialize_with = "nullable")]
    pub uuid: String,
    #[serde(deserialize_with = "nullable")]
    pub start: i64,
    #[serde(deserialize_with = "nullable")]
    pub length: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sticker {
    #[serde(deserialize_with = "nullable")]
    pub pack_id: String,
    #[serde(deserialize_with = "nullable")]
    pub sticker_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteDelete {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: i64,
}

/// Sync marker. The upstream content is not retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncMessage {}

/// Attachment metadata of a data message or quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachment {
    #[serde(deserialize_with = "nullable")]
    pub content_type: String,
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    pub filename: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub size: i64,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub caption: Option<String>,
    pub upload_timestamp: Option<i64>,
}

/// Decode `null` as the zero value of `T`.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
