//! The `run` command: signal wiring plus the daemon loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use appblocker_core::{BlockListStore, Daemon, ListPaths, SystemProcessTable};
use tracing::info;

pub async fn run(paths: ListPaths) -> anyhow::Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_signal_listener(shutdown.clone());

    let store = BlockListStore::new(paths);
    let mut daemon = Daemon::new(store, SystemProcessTable::new(), shutdown);
    daemon.run().await?;
    Ok(())
}

/// Flip the shutdown flag on SIGINT or SIGTERM. The loop notices at the next
/// tick boundary; nothing is interrupted mid-pass.
fn spawn_signal_listener(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        shutdown.store(true, Ordering::SeqCst);
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::error!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
