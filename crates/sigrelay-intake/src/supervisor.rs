//! Reconnect supervisor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sigrelay_protocols::MessageSource;

/// Pause between failed connection attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Supervisor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// Connected and reading frames.
    Receiving,
    /// Trying to (re)open the connection.
    Reconnecting,
}

/// Keeps a [`MessageSource`] connected and receiving for the life of the process.
///
/// A failed read moves to [`SupervisorState::Reconnecting`], which retries
/// `connect` immediately and then once per backoff interval, without limit.
/// The cancellation token is checked at every transition.
pub struct Supervisor {
    source: Arc<dyn MessageSource>,
    backoff: Duration,
    cancel: CancellationToken,
    reconnects: AtomicU64,
}

impl Supervisor {
    pub fn new(source: Arc<dyn MessageSource>, cancel: CancellationToken) -> Self {
        Self {
            source,
            backoff: DEFAULT_BACKOFF,
            cancel,
            reconnects: AtomicU64::new(0),
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Connection attempts made from the reconnecting state.
    pub fn reconnect_attempts(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }

    /// Run in a background task.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Connect, then supervise until cancelled.
    pub async fn run(&self) {
        let initial = self.initial_connect().await;
        self.run_from(initial).await;
    }

    /// First connection. A failure is logged and leaves the supervisor reconnecting.
    pub async fn initial_connect(&self) -> SupervisorState {
        match self.source.connect().await {
            Ok(()) => SupervisorState::Receiving,
            Err(e) => {
                warn!(error = %e, "Initial upstream connection failed, will retry");
                SupervisorState::Reconnecting
            }
        }
    }

    /// Supervise from `initial` until cancelled, then close the connection.
    pub async fn run_from(&self, initial: SupervisorState) {
        let mut state = initial;

        while !self.cancel.is_cancelled() {
            state = match state {
                SupervisorState::Receiving => {
                    let result = tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        result = self.source.receive_loop() => result,
                    };
                    match result {
                        Err(e) => warn!(error = %e, "Upstream receive failed, reconnecting"),
                        Ok(()) => warn!("Upstream receive ended, reconnecting"),
                    }
                    SupervisorState::Reconnecting
                }
                SupervisorState::Reconnecting => {
                    let attempt = self.reconnects.fetch_add(1, Ordering::Relaxed) + 1;
                    let result = tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        result = self.source.connect() => result,
                    };
                    match result {
                        Ok(()) => {
                            info!(attempt, "Reconnected to upstream");
                            SupervisorState::Receiving
                        }
                        Err(e) => {
                            warn!(
                                attempt,
                                error = %e,
                                backoff_ms = self.backoff.as_millis() as u64,
                                "Reconnect failed"
                            );
                            tokio::select! {
                                _ = self.cancel.cancelled() => break,
                                _ = tokio::time::sleep(self.backoff) => {}
                            }
                            SupervisorState::Reconnecting
                        }
                    }
                }
            };
        }

        if let Err(e) = self.source.close().await {
            debug!(error = %e, "Closing upstream connection failed");
        }
        info!("Supervisor stopped");
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
