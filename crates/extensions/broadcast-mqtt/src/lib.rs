//! # sigrelay MQTT Broadcast Extension
//!
//! Republishes every accepted message to `{topic_prefix}/message` as
//! `{"content": <message>, "types": [...]}`.
//!
//! The broadcaster is a [`MessageObserver`](sigrelay_protocols::MessageObserver);
//! register it on the intake client after [`MqttBroadcaster::connect`] succeeds.

pub mod broadcaster;
pub mod error;

pub use broadcaster::{MqttBroadcaster, KEEP_ALIVE};
pub use error::BroadcastError;
