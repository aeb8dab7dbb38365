// Bounded Queue Store

use super::error::{QueueError, Result};
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Ordered, capacity-limited item sequence behind a read/write lock.
///
/// Front-to-back order is delivery order. The capacity check and the
/// insertion share one write critical section, so concurrent producers can
/// never push the store past `capacity`.
#[derive(Debug)]
pub struct BoundedStore<T> {
    items: RwLock<VecDeque<T>>,
    capacity: usize,
}

impl<T> BoundedStore<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: RwLock::new(VecDeque::new()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append to the back
    pub fn push(&self, item: T) -> Result<()> {
        let mut items = self.write();
        self.ensure_room(&items)?;
        items.push_back(item);
        Ok(())
    }

    /// Insert ahead of every queued item
    pub fn push_front(&self, item: T) -> Result<()> {
        let mut items = self.write();
        self.ensure_room(&items)?;
        items.push_front(item);
        Ok(())
    }

    /// Remove the front item, if any
    pub fn pop_front(&self) -> Option<T> {
        self.write().pop_front()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every queued item, returning how many were discarded
    pub fn clear(&self) -> usize {
        let mut items = self.write();
        let discarded = items.len();
        items.clear();
        discarded
    }

    fn ensure_room(&self, items: &VecDeque<T>) -> Result<()> {
        if items.len() >= self.capacity {
            return Err(QueueError::QueueFull {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    // Nothing panics while holding the lock (handlers run outside it), so a
    // poisoned lock still guards a consistent VecDeque.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<T>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<T>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> BoundedStore<T> {
    /// Copy of up to `limit` front items; `0` or `limit >= len` copies everything
    pub fn peek(&self, limit: usize) -> Vec<T> {
        let items = self.read();
        let take = if limit == 0 || limit >= items.len() {
            items.len()
        } else {
            limit
        };
        items.iter().take(take).cloned().collect()
    }
}
