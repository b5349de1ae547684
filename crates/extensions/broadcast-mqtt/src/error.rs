//! Broadcast errors.

use thiserror::Error;

use sigrelay_protocols::NotifyError;

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("Invalid MQTT configuration: {0}")]
    InvalidConfig(String),

    #[error("MQTT connection failed: {0}")]
    Connect(String),

    #[error("MQTT connection timed out after {0}s")]
    ConnectTimeout(u64),

    #[error("MQTT publish failed: {0}")]
    Publish(String),
}

impl From<BroadcastError> for NotifyError {
    fn from(err: BroadcastError) -> Self {
        NotifyError::PublishFailed(err.to_string())
    }
}
