//! Graceful shutdown wiring.

use tokio::sync::watch;

/// Install the Ctrl+C handler and return the shutdown flag receiver.
///
/// First Ctrl+C flips the flag so the worker drains in-flight tasks; a
/// second Ctrl+C force quits.
pub fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("shutdown requested, finishing in-flight tasks (Ctrl+C again to force)");
        let _ = tx.send(true);

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::error!("forced shutdown");
            std::process::exit(130);
        }
    });

    rx
}
