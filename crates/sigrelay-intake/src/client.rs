//! Websocket intake client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace};
use url::Url;

use sigrelay_protocols::{
    classify, is_allowed, IntakeError, Message, MessageObserver, MessageSource, MessageType,
    NewMessage,
};

use crate::error::DecodeError;
use crate::notify::Notifier;
use crate::queue::MessageQueue;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upper bound on sending the close frame.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads the upstream receive feed into a [`MessageQueue`].
///
/// A message is queued when at least one of its types is in the allow-set;
/// everything else is decoded and dropped. Queued messages are also
/// announced to the registered observers.
pub struct IntakeClient {
    uri: Url,
    allow: Vec<MessageType>,
    /// Only touched by the supervising task.
    conn: Mutex<Option<WsStream>>,
    queue: MessageQueue,
    notifier: Notifier,
}

impl IntakeClient {
    pub fn new(uri: Url, allow: Vec<MessageType>) -> Self {
        Self {
            uri,
            allow,
            conn: Mutex::new(None),
            queue: MessageQueue::new(),
            notifier: Notifier::new(),
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn allowed_types(&self) -> &[MessageType] {
        &self.allow
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    /// Subscribe to accepted messages.
    pub fn register_observer(&self, observer: Arc<dyn MessageObserver>) {
        self.notifier.register(observer);
    }

    /// Decode every JSON object in `data` and record each one.
    ///
    /// Returns how many messages were queued. Decoding stops at the first
    /// malformed object; messages before it are kept.
    pub fn handle_frame(&self, data: &[u8]) -> Result<usize, DecodeError> {
        let mut stream = serde_json::Deserializer::from_slice(data).into_iter::<Message>();
        let mut accepted = 0;

        while let Some(item) = stream.next() {
            let message = item.map_err(|source| DecodeError {
                offset: stream.byte_offset(),
                source,
            })?;
            if self.record(message) {
                accepted += 1;
            }
        }

        Ok(accepted)
    }

    fn record(&self, message: Message) -> bool {
        let types = classify(&message);

        if !is_allowed(&types, &self.allow) {
            debug!(
                types = ?types,
                source = %message.envelope.source,
                "Dropped message of unrecorded type"
            );
            trace!(content = ?message, "Dropped message content");
            return false;
        }

        info!(
            types = ?types,
            source = %message.envelope.source,
            timestamp = message.envelope.timestamp,
            "Recorded message"
        );
        debug!(content = ?message, "Recorded message content");

        self.queue.enqueue(message.clone());
        self.notifier.publish(NewMessage::new(message, types));
        true
    }

    fn process_frame(&self, data: &[u8]) {
        if let Err(e) = self.handle_frame(data) {
            error!(error = %e, "Failed to decode upstream frame");
            debug!(frame = %String::from_utf8_lossy(data), "Undecodable frame");
        }
    }
}

#[async_trait]
impl MessageSource for IntakeClient {
    async fn connect(&self) -> Result<(), IntakeError> {
        let mut conn = self.conn.lock().await;

        if let Some(mut previous) = conn.take() {
            if let Err(e) = previous.close(None).await {
                debug!(error = %e, "Closing previous upstream connection failed");
            }
        }

        let (stream, response) = connect_async(self.uri.as_str())
            .await
            .map_err(|e| IntakeError::Connection(e.to_string()))?;

        info!(uri = %self.uri, status = %response.status(), "Connected to upstream");
        *conn = Some(stream);
        Ok(())
    }

    async fn receive_loop(&self) -> Result<(), IntakeError> {
        let mut conn = self.conn.lock().await;
        let stream = conn.as_mut().ok_or(IntakeError::NotConnected)?;

        let result = loop {
            match stream.next().await {
                Some(Ok(WsMessage::Text(text))) => self.process_frame(text.as_bytes()),
                Some(Ok(WsMessage::Binary(data))) => self.process_frame(&data),
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!(frame = ?frame, "Upstream sent close frame");
                    break Err(IntakeError::Closed);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break Err(IntakeError::Read(e.to_string())),
                None => break Err(IntakeError::Closed),
            }
        };

        *conn = None;
        result
    }

    async fn close(&self) -> Result<(), IntakeError> {
        let Some(mut stream) = self.conn.lock().await.take() else {
            return Ok(());
        };

        match tokio::time::timeout(CLOSE_TIMEOUT, stream.close(None)).await {
            Ok(Ok(())) => {
                info!(uri = %self.uri, "Closed upstream connection");
                Ok(())
            }
            Ok(Err(e)) => Err(IntakeError::Close(e.to_string())),
            Err(_) => Err(IntakeError::Close(format!(
                "timed out after {}s",
                CLOSE_TIMEOUT.as_secs()
            ))),
        }
    }

    fn pop(&self) -> Option<Message> {
        self.queue.pop()
    }

    fn flush(&self) -> Vec<Message> {
        self.queue.flush()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
