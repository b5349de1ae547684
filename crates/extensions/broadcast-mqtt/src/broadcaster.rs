//! MQTT broadcaster.

use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use sigrelay_config::MqttConfig;
use sigrelay_protocols::{MessageObserver, NewMessage, NotifyError};

use crate::error::BroadcastError;

/// Keep-alive interval sent to the broker.
pub const KEEP_ALIVE: Duration = Duration::from_secs(20);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const RETRY_INTERVAL: Duration = Duration::from_secs(1);
const REQUEST_CAPACITY: usize = 64;

/// Publishes [`NewMessage`] events to an MQTT topic.
pub struct MqttBroadcaster {
    client: AsyncClient,
    topic: String,
    qos: QoS,
}

impl MqttBroadcaster {
    /// Connect to the broker and wait for its CONNACK.
    ///
    /// On success the event loop keeps running in a background task until
    /// `cancel` fires, reconnecting on errors.
    pub async fn connect(
        config: &MqttConfig,
        cancel: CancellationToken,
    ) -> Result<Self, BroadcastError> {
        let options = mqtt_options(config)?;
        let qos = qos_from_level(config.qos)?;
        let (host, port) = options.broker_address();

        let (client, mut eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);

        tokio::time::timeout(CONNECT_TIMEOUT, await_connack(&mut eventloop))
            .await
            .map_err(|_| BroadcastError::ConnectTimeout(CONNECT_TIMEOUT.as_secs()))??;

        info!(host = %host, port, topic = %config.topic(), "MQTT connection established");
        tokio::spawn(run_event_loop(eventloop, client.clone(), cancel));

        Ok(Self {
            client,
            topic: config.topic(),
            qos,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub async fn publish(&self, event: &NewMessage) -> Result<(), BroadcastError> {
        let payload = payload(event).map_err(|e| BroadcastError::Publish(e.to_string()))?;
        self.client
            .publish(self.topic.as_str(), self.qos, false, payload)
            .await
            .map_err(|e| BroadcastError::Publish(e.to_string()))
    }
}

#[async_trait]
impl MessageObserver for MqttBroadcaster {
    fn name(&self) -> &str {
        "mqtt"
    }

    async fn on_message(&self, event: &NewMessage) -> Result<(), NotifyError> {
        debug!(topic = %self.topic, types = ?event.types, "Broadcasting new message");
        self.publish(event).await.map_err(|e| {
            error!(error = %e, "Error while publishing message");
            NotifyError::from(e)
        })
    }
}

/// Broker payload: `{"content": <message>, "types": [...]}`.
pub fn payload(event: &NewMessage) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(event)
}

/// Client options for the configured broker.
pub fn mqtt_options(config: &MqttConfig) -> Result<MqttOptions, BroadcastError> {
    if config.client_id.is_empty() || config.client_id.starts_with(' ') {
        return Err(BroadcastError::InvalidConfig(format!(
            "invalid client id '{}'",
            config.client_id
        )));
    }

    let (host, port) = config
        .broker_address()
        .map_err(|e| BroadcastError::InvalidConfig(e.to_string()))?;

    let mut options = MqttOptions::new(config.client_id.clone(), host, port);
    options.set_keep_alive(KEEP_ALIVE);
    // Persistent session; needs the non-empty client id checked above.
    options.set_clean_session(false);

    if let Some(user) = &config.user {
        options.set_credentials(user.clone(), config.password.clone().unwrap_or_default());
    }

    Ok(options)
}

pub fn qos_from_level(level: u8) -> Result<QoS, BroadcastError> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => Err(BroadcastError::InvalidConfig(format!(
            "QoS must be 0, 1 or 2, got {}",
            other
        ))),
    }
}

async fn await_connack(eventloop: &mut EventLoop) -> Result<(), BroadcastError> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                debug!(session_present = ack.session_present, "Received CONNACK");
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => return Err(BroadcastError::Connect(e.to_string())),
        }
    }
}

async fn run_event_loop(mut eventloop: EventLoop, client: AsyncClient, cancel: CancellationToken) {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = eventloop.poll() => event,
        };

        match event {
            Ok(Event::Incoming(Packet::ConnAck(_))) => info!("MQTT connection re-established"),
            Ok(Event::Incoming(Packet::Disconnect)) => warn!("MQTT broker requested disconnect"),
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "MQTT connection error");
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(RETRY_INTERVAL) => {}
                }
            }
        }
    }

    if client.try_disconnect().is_ok() {
        let _ = tokio::time::timeout(RETRY_INTERVAL, async {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        })
        .await;
    }
    debug!("MQTT event loop stopped");
}
