// Queue - bounded store plus its background consumer

use crate::application::consumer::{shutdown_channel, Consumer, ShutdownSender, ShutdownToken};
use crate::application::drain::{drain, DrainReport};
use crate::domain::{BoundedStore, QueueConfig, QueueError};
use crate::error::{AppError, Result};
use crate::port::{ItemHandler, QueueStats};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// State shared between the queue handle and its consumer task
pub(crate) struct Shared<T> {
    pub(crate) store: BoundedStore<T>,
    pub(crate) config: QueueConfig,
    handler: Arc<dyn ItemHandler<T>>,
    metrics: Metrics,
}

#[derive(Default)]
struct Metrics {
    drained_total: AtomicU64,
    handler_failures: AtomicU64,
    cycles: AtomicU64,
    rejected_total: AtomicU64,
}

impl<T> Shared<T> {
    pub(crate) fn drain(&self, max_items: usize) -> Result<DrainReport> {
        let report = drain(&self.store, max_items, self.handler.as_ref())?;

        self.metrics.cycles.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .drained_total
            .fetch_add(report.removed as u64, Ordering::Relaxed);
        self.metrics
            .handler_failures
            .fetch_add(report.failed as u64, Ordering::Relaxed);

        Ok(report)
    }

    fn record_push(&self, result: std::result::Result<(), QueueError>) -> Result<()> {
        if result.is_err() {
            self.metrics.rejected_total.fetch_add(1, Ordering::Relaxed);
        }
        Ok(result?)
    }
}

/// Bounded FIFO queue drained in batches by a background consumer.
///
/// The consumer starts when the queue is built and, unless a shutdown is
/// signalled, keeps running for the life of the process.
///
/// # Example
/// ```no_run
/// # async fn example() -> batchq_core::Result<()> {
/// use batchq_core::Queue;
/// use std::time::Duration;
///
/// let queue = Queue::builder()
///     .capacity(1_000)
///     .drain_batch_size(50)
///     .idle_interval(Duration::from_secs(5))
///     .handler(|line: String| println!("{}", line))
///     .build()?;
///
/// queue.push("hello".to_string())?;
/// # Ok(())
/// # }
/// ```
pub struct Queue<T> {
    shared: Arc<Shared<T>>,
    shutdown_tx: ShutdownSender,
    consumer: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> Queue<T> {
    pub fn builder() -> QueueBuilder<T> {
        QueueBuilder::new()
    }

    /// Append to the back; fails with `QueueFull` once at capacity
    pub fn push(&self, item: T) -> Result<()> {
        self.shared.record_push(self.shared.store.push(item))
    }

    /// Insert ahead of every queued item (e.g. retry before new work)
    pub fn push_front(&self, item: T) -> Result<()> {
        self.shared.record_push(self.shared.store.push_front(item))
    }

    pub fn len(&self) -> usize {
        self.shared.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.store.is_empty()
    }

    /// Empty the queue; configuration and the consumer are untouched
    pub fn clear(&self) -> usize {
        let discarded = self.shared.store.clear();
        debug!(discarded, "Queue cleared");
        discarded
    }

    /// Drain up to `max_items` on the calling thread
    pub fn drain(&self, max_items: usize) -> Result<usize> {
        Ok(self.shared.drain(max_items)?.removed)
    }

    /// Drain one batch of the configured size on the calling thread
    pub fn trigger_drain(&self) -> Result<usize> {
        let removed = self.drain(self.shared.config.drain_batch_size)?;
        info!(removed, "Triggered drain completed");
        Ok(removed)
    }

    pub fn config(&self) -> &QueueConfig {
        &self.shared.config
    }

    pub fn stats(&self) -> QueueStats {
        let metrics = &self.shared.metrics;
        QueueStats {
            len: self.len(),
            capacity: self.shared.config.capacity,
            drain_batch_size: self.shared.config.drain_batch_size,
            drained_total: metrics.drained_total.load(Ordering::Relaxed),
            handler_failures: metrics.handler_failures.load(Ordering::Relaxed),
            cycles: metrics.cycles.load(Ordering::Relaxed),
            rejected_total: metrics.rejected_total.load(Ordering::Relaxed),
        }
    }

    /// Stop the background consumer and wait for it to exit.
    ///
    /// Queued items stay in place and can still be drained by hand.
    pub async fn shutdown(&self) {
        self.shutdown_tx.shutdown();
        if let Some(handle) = self.consumer.lock().await.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = ?e, "Queue consumer ended abnormally");
            }
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Queue<T> {
    /// Copy of up to `limit` front items (`0` = all) without removing them
    pub fn peek(&self, limit: usize) -> Vec<T> {
        self.shared.store.peek(limit)
    }
}

/// Builder for [`Queue`]; a handler is required
pub struct QueueBuilder<T> {
    config: QueueConfig,
    handler: Option<Arc<dyn ItemHandler<T>>>,
    shutdown: Option<ShutdownToken>,
}

impl<T: Send + Sync + 'static> QueueBuilder<T> {
    pub fn new() -> Self {
        Self {
            config: QueueConfig::default(),
            handler: None,
            shutdown: None,
        }
    }

    pub fn config(mut self, config: QueueConfig) -> Self {
        self.config = config;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// `0` falls back to the default of 100
    pub fn drain_batch_size(mut self, size: usize) -> Self {
        self.config.drain_batch_size = size;
        self
    }

    /// Zero falls back to the default of 20s
    pub fn idle_interval(mut self, interval: Duration) -> Self {
        self.config.idle_interval = interval;
        self
    }

    /// Zero falls back to the default of 1s
    pub fn catch_up_interval(mut self, interval: Duration) -> Self {
        self.config.catch_up_interval = interval;
        self
    }

    pub fn handler(self, handler: impl ItemHandler<T> + 'static) -> Self {
        self.shared_handler(Arc::new(handler))
    }

    /// Use an already shared handler (e.g. one the caller also inspects)
    pub fn shared_handler(mut self, handler: Arc<dyn ItemHandler<T>>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Extra cancellation signal observed by the consumer
    pub fn shutdown_token(mut self, token: ShutdownToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Build the queue and start its consumer on the current tokio runtime
    pub fn build(self) -> Result<Queue<T>> {
        let handler = self
            .handler
            .ok_or_else(|| AppError::Validation("handler is required".to_string()))?;

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            AppError::Config(format!("queue consumer needs a tokio runtime: {}", e))
        })?;

        let shared = Arc::new(Shared {
            store: BoundedStore::new(self.config.capacity),
            config: self.config.normalized(),
            handler,
            metrics: Metrics::default(),
        });

        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        let consumer = Consumer::new(Arc::clone(&shared), shutdown_rx, self.shutdown);
        let handle = runtime.spawn(consumer.run());

        Ok(Queue {
            shared,
            shutdown_tx,
            consumer: tokio::sync::Mutex::new(Some(handle)),
        })
    }
}

impl<T: Send + Sync + 'static> Default for QueueBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::item_handler::mocks::RecordingHandler;

    fn recording_queue(
        capacity: usize,
        batch: usize,
    ) -> (Queue<String>, Arc<RecordingHandler<String>>) {
        let handler = Arc::new(RecordingHandler::new());
        let queue = Queue::builder()
            .capacity(capacity)
            .drain_batch_size(batch)
            .idle_interval(Duration::from_secs(3600))
            .shared_handler(handler.clone())
            .build()
            .unwrap();
        (queue, handler)
    }

    #[test]
    fn test_build_without_handler_fails() {
        tokio_test::block_on(async {
            let result = Queue::<u32>::builder().capacity(10).build();
            assert!(matches!(result, Err(AppError::Validation(_))));
        });
    }

    #[test]
    fn test_build_outside_runtime_fails() {
        let result = Queue::builder().handler(|_: u32| {}).build();
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_build_normalizes_config() {
        let queue = Queue::builder()
            .capacity(7)
            .drain_batch_size(0)
            .idle_interval(Duration::ZERO)
            .handler(|_: u32| {})
            .build()
            .unwrap();

        assert_eq!(queue.config().capacity, 7);
        assert_eq!(queue.config().drain_batch_size, 100);
        assert_eq!(queue.config().idle_interval, Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_capacity_two_scenario() {
        let (queue, _) = recording_queue(2, 100);

        queue.push("A".to_string()).unwrap();
        queue.push("B".to_string()).unwrap();
        assert_eq!(queue.len(), 2);

        let err = queue.push("C".to_string()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Queue(QueueError::QueueFull { capacity: 2 })
        ));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.stats().rejected_total, 1);
    }

    #[tokio::test]
    async fn test_batch_of_three_scenario() {
        let (queue, handler) = recording_queue(10, 3);
        for i in 1..=5 {
            queue.push(format!("I{}", i)).unwrap();
        }

        let removed = queue.trigger_drain().unwrap();

        assert_eq!(removed, 3);
        assert_eq!(handler.delivered(), vec!["I1", "I2", "I3"]);
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn test_len_tracks_pushes_and_removals() {
        let (queue, _) = recording_queue(100, 100);
        for i in 0..10 {
            queue.push(i.to_string()).unwrap();
        }
        assert_eq!(queue.drain(4).unwrap(), 4);
        queue.push_front("x".to_string()).unwrap();

        assert_eq!(queue.len(), 10 - 4 + 1);
    }

    #[tokio::test]
    async fn test_peek_does_not_change_len() {
        let (queue, _) = recording_queue(10, 3);
        queue.push("a".to_string()).unwrap();
        queue.push("b".to_string()).unwrap();

        assert_eq!(queue.peek(1), vec!["a"]);
        assert_eq!(queue.peek(0), vec!["a", "b"]);
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_keeps_queue_usable() {
        let (queue, handler) = recording_queue(3, 3);
        for i in 0..3 {
            queue.push(i.to_string()).unwrap();
        }

        assert_eq!(queue.clear(), 3);
        assert!(queue.is_empty());

        queue.push("after".to_string()).unwrap();
        assert_eq!(queue.trigger_drain().unwrap(), 1);
        assert_eq!(handler.delivered(), vec!["after"]);
    }

    #[tokio::test]
    async fn test_stats_count_cycles_and_failures() {
        let handler = Arc::new(RecordingHandler::panicking_on(|item: &u32| *item == 2));
        let queue = Queue::builder()
            .capacity(10)
            .drain_batch_size(10)
            .idle_interval(Duration::from_secs(3600))
            .shared_handler(handler.clone())
            .build()
            .unwrap();
        for i in 1..=3 {
            queue.push(i).unwrap();
        }

        queue.trigger_drain().unwrap();
        queue.trigger_drain().unwrap();

        let stats = queue.stats();
        assert_eq!(stats.cycles, 2);
        assert_eq!(stats.drained_total, 3);
        assert_eq!(stats.handler_failures, 1);
        assert_eq!(stats.len, 0);
        assert_eq!(handler.delivered(), vec![1, 3]);
    }
}
