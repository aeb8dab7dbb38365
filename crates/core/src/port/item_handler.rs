// Item Handler Port

/// Per-item callback invoked once for every item removed by a drain.
///
/// Handlers run outside the store lock and may run concurrently (background
/// consumer vs. a triggered drain), so side effects must be thread-safe.
pub trait ItemHandler<T>: Send + Sync {
    fn handle(&self, item: T);
}

impl<T, F> ItemHandler<T> for F
where
    F: Fn(T) + Send + Sync,
{
    fn handle(&self, item: T) {
        self(item)
    }
}

/// Test handlers
pub mod mocks {
    use super::ItemHandler;
    use std::sync::Mutex;

    /// Records every delivered item, optionally panicking on selected ones
    pub struct RecordingHandler<T> {
        delivered: Mutex<Vec<T>>,
        panic_on: Option<Box<dyn Fn(&T) -> bool + Send + Sync>>,
    }

    impl<T> RecordingHandler<T> {
        pub fn new() -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
                panic_on: None,
            }
        }

        /// Panic (without recording) for items matching `predicate`
        pub fn panicking_on(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
                panic_on: Some(Box::new(predicate)),
            }
        }

        pub fn count(&self) -> usize {
            self.delivered.lock().unwrap().len()
        }
    }

    impl<T: Clone> RecordingHandler<T> {
        pub fn delivered(&self) -> Vec<T> {
            self.delivered.lock().unwrap().clone()
        }
    }

    impl<T> Default for RecordingHandler<T> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<T: Send> ItemHandler<T> for RecordingHandler<T> {
        fn handle(&self, item: T) {
            if let Some(predicate) = &self.panic_on {
                if predicate(&item) {
                    panic!("handler rejected item"); // Actually panic for isolation testing
                }
            }
            self.delivered.lock().unwrap().push(item);
        }
    }
}
