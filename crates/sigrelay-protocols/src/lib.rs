//! # sigrelay Protocols
//!
//! Shared definitions for the sigrelay workspace.
//! Contains the upstream message model and the interfaces between crates.
//!
//! ## Contents
//!
//! - [`Message`] - Decoded envelope received from the Signal receive API
//! - [`MessageType`] - Closed set of semantic message types
//! - [`classify`] - Maps a message to the types it satisfies
//! - [`MessageSource`] - Connect/receive/pop/flush interface implemented by the intake client
//! - [`MessageObserver`] - Subscriber for newly accepted messages

pub mod classify;
pub mod error;
pub mod message;
pub mod message_type;
pub mod observer;
pub mod source;

pub use classify::{classify, is_allowed};
pub use error::{IntakeError, NotifyError, UnknownMessageType};
pub use message::{
    Attachment, DataMessage, Envelope, GroupInfo, Mention, Message, Quote, ReceiptMessage,
    RemoteDelete, Sticker, SyncMessage, TypingMessage,
};
pub use message_type::MessageType;
pub use observer::{MessageObserver, NewMessage};
pub use source::MessageSource;
