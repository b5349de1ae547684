//! Delivery server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sigrelay_intake::Supervisor;

use crate::error::ApiError;
use crate::routes::create_router;
use crate::state::DeliveryState;

/// Serves the delivery routes while a [`Supervisor`] keeps the source receiving.
pub struct DeliveryServer {
    addr: String,
    state: Arc<DeliveryState>,
    supervisor: Arc<Supervisor>,
}

impl DeliveryServer {
    pub fn new(addr: impl Into<String>, state: Arc<DeliveryState>, supervisor: Arc<Supervisor>) -> Self {
        Self {
            addr: addr.into(),
            state,
            supervisor,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Bind the configured address and serve until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), ApiError> {
        let listener = TcpListener::bind(&self.addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    ///
    /// The supervisor runs for as long as the server does and is awaited
    /// before returning.
    pub async fn serve(self, listener: TcpListener, shutdown: CancellationToken) -> Result<(), ApiError> {
        let local = listener.local_addr()?;
        let supervisor = self.supervisor.clone().spawn();
        let app = create_router(self.state.clone());

        info!(
            addr = %local,
            repeat_last = self.state.repeat_last(),
            "Delivery server listening"
        );

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .await;

        // Stop the supervisor also when the server exits on its own.
        shutdown.cancel();
        if let Err(e) = supervisor.await {
            warn!(error = %e, "Supervisor task failed");
        }

        info!(
            reconnects = self.supervisor.reconnect_attempts(),
            "Delivery server stopped"
        );
        result.map_err(ApiError::from)
    }
}
