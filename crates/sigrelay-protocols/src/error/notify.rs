//! Observer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_failed_error() {
        let err = NotifyError::PublishFailed("broker gone".to_string());
        assert!(err.to_string().contains("Publish failed"));
        assert!(err.to_string().contains("broker gone"));
    }

    #[test]
    fn test_encode_error_from() {
        let json_err = serde_json::from_str::<u8>("x").unwrap_err();
        let err = NotifyError::from(json_err);
        assert!(err.to_string().starts_with("Encoding failed"));
    }
}
