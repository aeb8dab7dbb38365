// Panic isolation for handler invocations
use std::panic::{catch_unwind, UnwindSafe};
use tracing::error;

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed successfully
    Success(T),
    /// Execution panicked
    Panicked(String),
}

/// Execute a closure with panic isolation
///
/// If the closure panics, the panic is caught and returned as
/// `PanicGuardResult::Panicked`, so one bad item cannot take down the
/// consumer that is draining it.
///
/// # Example
/// ```text
/// let result = execute_guarded(AssertUnwindSafe(|| handler.handle(item)));
///
/// if let PanicGuardResult::Panicked(msg) = result {
///     warn!("handler failed: {}", msg);
/// }
/// ```
pub fn execute_guarded<F, T>(f: F) -> PanicGuardResult<T>
where
    F: FnOnce() -> T + UnwindSafe,
{
    match catch_unwind(f) {
        Ok(result) => PanicGuardResult::Success(result),
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };

            error!(panic_msg = %panic_msg, "Item handler panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_value_through() {
        match execute_guarded(|| 21 * 2) {
            PanicGuardResult::Success(v) => assert_eq!(v, 42),
            PanicGuardResult::Panicked(msg) => panic!("unexpected panic: {}", msg),
        }
    }

    #[test]
    fn test_str_panic_is_captured() {
        let result = execute_guarded(|| -> () { panic!("boom") });
        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "boom"),
            PanicGuardResult::Success(_) => panic!("expected panic"),
        }
    }

    #[test]
    fn test_formatted_panic_is_captured() {
        let id = 7;
        let result = execute_guarded(move || -> () { panic!("item {} rejected", id) });
        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "item 7 rejected"),
            PanicGuardResult::Success(_) => panic!("expected panic"),
        }
    }
}
