//! Internal disposal bag for release hooks of cached instances.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::{DisposeError, ReleaseFailure};
use crate::key::Key;
use crate::observer::Observers;

type Disposer = Box<dyn FnOnce() -> Result<(), DisposeError> + Send>;

/// Release hooks in creation order, run LIFO.
///
/// Every hook runs exactly once. A hook that errors or panics is recorded
/// and the remaining hooks still run.
#[derive(Default)]
pub(crate) struct DisposeBag {
    entries: Vec<(Key, Disposer)>,
}

impl DisposeBag {
    pub(crate) fn push(&mut self, key: Key, disposer: Disposer) {
        self.entries.push((key, disposer));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Execute all hooks in reverse order, collecting failures.
    pub(crate) fn run_all_reverse(&mut self, observers: &Observers) -> Vec<ReleaseFailure> {
        let mut failures = Vec::new();
        while let Some((key, disposer)) = self.entries.pop() {
            let outcome = match catch_unwind(AssertUnwindSafe(disposer)) {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(payload) => Err(panic_message(payload.as_ref())),
            };
            match outcome {
                Ok(()) => observers.released(&key),
                Err(message) => {
                    tracing::warn!(service = key.display_name(), %message, "release hook failed");
                    observers.release_failed(&key, &message);
                    failures.push(ReleaseFailure {
                        service: key.display_name(),
                        message,
                    });
                }
            }
        }
        failures
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}
