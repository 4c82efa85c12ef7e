use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::manager::QueueManager;

/// Tick cadence of the reference host: 20 cycles per second.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(50);

/// Tick driver handle.
/// - `request_shutdown()` stops the loop after the current tick
/// - `shutdown_and_join()` waits for the loop to exit
pub struct TickDriver {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TickDriver {
    /// Spawn the tick loop, invoking `manager.tick()` once per period.
    pub fn spawn(manager: QueueManager, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                if *shutdown_rx.borrow() {
                    break;
                }
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        continue;
                    }
                    _ = interval.tick() => {}
                }
                manager.tick().await;
            }
            tracing::debug!("tick loop stopped");
        });

        Self { shutdown_tx, join }
    }

    /// Request shutdown. The tick in flight (if any) still completes.
    pub fn request_shutdown(&self) {
        // ignore send error: the receiver may already be dropped
        let _ = self.shutdown_tx.send(true);
    }

    /// Shutdown and wait for the loop to exit.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}
