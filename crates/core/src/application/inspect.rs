//! Inspection/Trigger Surface
//!
//! JSON view of a queue for transports: "pop now" and "peek", plus the
//! `QueueControl` port implementation the RPC layer is written against.

use crate::application::Queue;
use crate::error::Result;
use crate::port::{QueueControl, QueueStats};
use serde::de::DeserializeOwned;
use serde::Serialize;

impl<T> Queue<T>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    /// Up to `limit` front items (`0` = all) serialized as a JSON array
    pub fn inspect(&self, limit: usize) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.peek(limit))?)
    }
}

impl<T> QueueControl for Queue<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn push_value(&self, item: serde_json::Value, front: bool) -> Result<()> {
        let item: T = serde_json::from_value(item)?;
        if front {
            self.push_front(item)
        } else {
            self.push(item)
        }
    }

    fn trigger_drain(&self) -> Result<usize> {
        Queue::trigger_drain(self)
    }

    fn inspect(&self, limit: usize) -> Result<serde_json::Value> {
        Queue::inspect(self, limit)
    }

    fn clear(&self) -> usize {
        Queue::clear(self)
    }

    fn stats(&self) -> QueueStats {
        Queue::stats(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::item_handler::mocks::RecordingHandler;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Event {
        id: u32,
        kind: String,
    }

    fn event_queue() -> (Arc<Queue<Event>>, Arc<RecordingHandler<Event>>) {
        let handler = Arc::new(RecordingHandler::new());
        let queue = Queue::builder()
            .capacity(10)
            .drain_batch_size(2)
            .idle_interval(Duration::from_secs(3600))
            .shared_handler(handler.clone())
            .build()
            .unwrap();
        (Arc::new(queue), handler)
    }

    #[tokio::test]
    async fn test_inspect_serializes_front_items() {
        let (queue, _) = event_queue();
        for id in 1..=3 {
            queue
                .push(Event {
                    id,
                    kind: "click".to_string(),
                })
                .unwrap();
        }

        let value = queue.inspect(2).unwrap();
        assert_eq!(
            value,
            json!([{"id": 1, "kind": "click"}, {"id": 2, "kind": "click"}])
        );
        assert_eq!(queue.inspect(0).unwrap().as_array().unwrap().len(), 3);
        assert_eq!(queue.len(), 3);
    }

    #[tokio::test]
    async fn test_inspect_empty_queue_is_empty_array() {
        let (queue, _) = event_queue();
        assert_eq!(queue.inspect(0).unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_inspect_reports_serialization_failure() {
        // Tuple keys cannot become JSON object keys
        let queue = Queue::builder()
            .capacity(4)
            .handler(|_: BTreeMap<(u8, u8), u8>| {})
            .build()
            .unwrap();
        queue.push(BTreeMap::from([((1, 2), 3)])).unwrap();

        let err = queue.inspect(0).unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_control_push_and_trigger() {
        let (queue, handler) = event_queue();
        let control: Arc<dyn QueueControl> = queue.clone();

        control
            .push_value(json!({"id": 1, "kind": "new"}), false)
            .unwrap();
        control
            .push_value(json!({"id": 0, "kind": "retry"}), true)
            .unwrap();
        control
            .push_value(json!({"id": 2, "kind": "new"}), false)
            .unwrap();

        assert_eq!(control.trigger_drain().unwrap(), 2);
        let ids: Vec<u32> = handler.delivered().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(control.stats().len, 1);
    }

    #[tokio::test]
    async fn test_control_push_rejects_bad_payload() {
        let (queue, _) = event_queue();

        let err = queue.push_value(json!({"id": "nope"}), false).unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_control_clear() {
        let (queue, _) = event_queue();
        queue.push_value(json!({"id": 1, "kind": "a"}), false).unwrap();

        assert_eq!(QueueControl::clear(queue.as_ref()), 1);
        assert_eq!(QueueControl::stats(queue.as_ref()).len, 0);
    }
}
