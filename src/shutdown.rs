//! OS signal handling.

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Cancel `token` on SIGINT or SIGTERM.
#[cfg(unix)]
pub(crate) fn cancel_on_signal(token: CancellationToken) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
            _ = token.cancelled() => return,
        }
        token.cancel();
    });

    Ok(())
}

/// Cancel `token` on Ctrl+C.
#[cfg(not(unix))]
pub(crate) fn cancel_on_signal(token: CancellationToken) -> std::io::Result<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    info!("Received Ctrl+C");
                }
            }
            _ = token.cancelled() => return,
        }
        token.cancel();
    });

    Ok(())
}
