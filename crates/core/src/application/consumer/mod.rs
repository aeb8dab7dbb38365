// Consumer - adaptive background drain loop

mod panic_guard;
mod shutdown;

pub use panic_guard::{execute_guarded, PanicGuardResult};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::queue::Shared;
use crate::domain::QueueConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Wait before the next cycle given the backlog left by the last one.
///
/// More than one batch left means the queue is falling behind, so the next
/// cycle comes after the short catch-up interval; otherwise after the idle one.
pub fn next_interval(backlog: usize, config: &QueueConfig) -> Duration {
    if backlog > config.drain_batch_size {
        config.catch_up_interval
    } else {
        config.idle_interval
    }
}

/// Background task that drains a queue on an adaptive timer
pub(crate) struct Consumer<T> {
    shared: Arc<Shared<T>>,
    shutdown: ShutdownToken,
    external: Option<ShutdownToken>,
}

impl<T: Send + Sync + 'static> Consumer<T> {
    pub(crate) fn new(
        shared: Arc<Shared<T>>,
        shutdown: ShutdownToken,
        external: Option<ShutdownToken>,
    ) -> Self {
        Self {
            shared,
            shutdown,
            external,
        }
    }

    /// Run until either shutdown token fires
    pub(crate) async fn run(mut self) {
        let config = self.shared.config.clone();
        info!(
            idle_interval_ms = config.idle_interval.as_millis() as u64,
            catch_up_interval_ms = config.catch_up_interval.as_millis() as u64,
            drain_batch_size = config.drain_batch_size,
            "Queue consumer started"
        );

        let mut wait = config.idle_interval;
        loop {
            if self.is_shutdown() {
                break;
            }

            tokio::select! {
                _ = sleep(wait) => {},
                _ = wait_for_shutdown(&mut self.shutdown, &mut self.external) => {
                    info!("Queue consumer interrupted while waiting");
                    break;
                }
            }

            self.run_cycle().await;

            let backlog = self.shared.store.len();
            wait = next_interval(backlog, &config);
            if backlog > config.drain_batch_size {
                debug!(backlog, "Backlog exceeds one batch, catching up");
            }
        }

        info!("Queue consumer stopped");
    }

    /// One drain cycle on the blocking pool; handlers may block
    async fn run_cycle(&self) {
        let shared = Arc::clone(&self.shared);
        let batch = self.shared.config.drain_batch_size;

        match tokio::task::spawn_blocking(move || shared.drain(batch)).await {
            Ok(Ok(report)) => {
                debug!(
                    removed = report.removed,
                    failed = report.failed,
                    "Drain cycle completed"
                );
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Drain cycle failed");
            }
            Err(join_err) => {
                // Handler panics are caught per item; this is the blocking task itself
                error!(error = ?join_err, "Drain cycle aborted");
            }
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.is_shutdown()
            || self
                .external
                .as_ref()
                .is_some_and(ShutdownToken::is_shutdown)
    }
}

async fn wait_for_shutdown(own: &mut ShutdownToken, external: &mut Option<ShutdownToken>) {
    match external {
        Some(external) => {
            tokio::select! {
                _ = own.wait() => {},
                _ = external.wait() => {},
            }
        }
        None => own.wait().await,
    }
}
