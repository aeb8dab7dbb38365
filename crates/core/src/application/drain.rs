//! Batch Drain - removes front items one lock acquisition at a time
//!
//! The store lock is taken and released per item, and the handler runs
//! outside it. Producers stay unblocked between handler calls; the price is
//! that a batch is not atomic, and a concurrent `clear()` or drain may take
//! items out from under it.

use crate::application::consumer::{execute_guarded, PanicGuardResult};
use crate::domain::BoundedStore;
use crate::error::Result;
use crate::port::ItemHandler;
use std::panic::AssertUnwindSafe;
use tracing::warn;

/// Outcome of one drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Items this drain removed from the store
    pub removed: usize,
    /// Removed items whose handler panicked
    pub failed: usize,
}

/// Remove up to `max_items` from the front of `store`, handing each to `handler`.
///
/// `max_items` is clamped to the length observed on entry. A handler panic
/// is caught, logged, and counted in `failed`; the item still counts as
/// removed and the drain moves on to the next one.
pub fn drain<T, H>(store: &BoundedStore<T>, max_items: usize, handler: &H) -> Result<DrainReport>
where
    H: ItemHandler<T> + ?Sized,
{
    let max_items = max_items.min(store.len());
    let mut report = DrainReport::default();

    for _ in 0..max_items {
        // Someone else emptied the store mid-batch
        let Some(item) = store.pop_front() else {
            break;
        };
        report.removed += 1;

        if let PanicGuardResult::Panicked(msg) =
            execute_guarded(AssertUnwindSafe(|| handler.handle(item)))
        {
            report.failed += 1;
            warn!(error = %msg, "Dropping item after handler panic");
        }
    }

    Ok(report)
}
