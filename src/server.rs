//! Server wiring.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use sigrelay_api::{DeliveryServer, DeliveryState};
use sigrelay_broadcast_mqtt::MqttBroadcaster;
use sigrelay_config::Config;
use sigrelay_intake::{IntakeClient, Supervisor};

use crate::shutdown::cancel_on_signal;

/// Run the relay until SIGINT or SIGTERM.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting sigrelay v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = CancellationToken::new();
    cancel_on_signal(shutdown.clone())?;

    let uri = config.signal.receive_url()?;
    let allow = config.receiver.record_message_types.clone();
    info!(
        uri = %uri,
        types = ?allow,
        repeat_last = config.receiver.repeat_last_message,
        "Intake configured"
    );
    let client = Arc::new(IntakeClient::new(uri, allow));

    if let Some(mqtt) = &config.mqtt {
        let broadcaster = MqttBroadcaster::connect(mqtt, shutdown.clone()).await?;
        client.register_observer(Arc::new(broadcaster));
    }

    let supervisor = Arc::new(Supervisor::new(client.clone(), shutdown.clone()));
    let state = Arc::new(DeliveryState::new(
        client,
        config.receiver.repeat_last_message,
    ));

    DeliveryServer::new(config.server.bind_address()?, state, supervisor)
        .run(shutdown)
        .await?;

    info!("Shutting down...");
    Ok(())
}
