//! Message source interface.

use async_trait::async_trait;

use crate::error::IntakeError;
use crate::message::Message;

/// An upstream connection that buffers accepted messages for consumers.
///
/// `connect` and `receive_loop` are driven by a single supervising task.
/// `pop` and `flush` may be called concurrently from any number of tasks.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Open a new upstream connection, closing any previous one.
    async fn connect(&self) -> Result<(), IntakeError>;

    /// Read frames until the connection fails. Only returns on error.
    async fn receive_loop(&self) -> Result<(), IntakeError>;

    /// Close the current connection, if any, with a close handshake.
    async fn close(&self) -> Result<(), IntakeError> {
        Ok(())
    }

    /// Remove and return the oldest buffered message.
    fn pop(&self) -> Option<Message>;

    /// Remove and return every buffered message, oldest first.
    fn flush(&self) -> Vec<Message>;
}
