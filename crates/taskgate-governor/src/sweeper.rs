//! Background sweeping of expired rate windows.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

use crate::registry::GovernorRegistry;

/// Spawns the sweeper. It stops when `cancel` flips to `true` or its sender is dropped.
pub fn spawn_sweeper(
    registry: Arc<GovernorRegistry>,
    every: Duration,
    mut cancel: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(interval_seconds = every.as_secs(), "Rate window sweeper started");

        let mut interval = time::interval(every);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let removed = registry.sweep_all();
                    tracing::trace!(removed, "Rate window sweep complete");
                }
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Rate window sweeper shutting down");
                        break;
                    }
                }
            }
        }
    })
}
