//! Observation hooks for resolution and release events.
//!
//! Observers see every resolution the container performs, including the
//! dependency resolutions made from inside factories, plus every release
//! hook that runs during teardown or scope close. They are meant for
//! tracing, metrics and debugging; they cannot influence the outcome.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::error::DiError;
use crate::key::Key;

/// Observer of container activity.
///
/// Every method has an empty default so implementations only override what
/// they care about.
///
/// # Examples
///
/// ```
/// use ferrule::{Container, DiObserver, Key, Resolver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl DiObserver for Counter {
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let counter = Arc::new(Counter::default());
/// let container = Container::new();
/// container.add_observer(counter.clone());
/// container.add_instance(5u8).unwrap();
///
/// container.get_required::<u8>();
/// assert_eq!(counter.0.load(Ordering::Relaxed), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a service is resolved.
    fn resolving(&self, _key: &Key) {}

    /// Called after a service resolved successfully.
    fn resolved(&self, _key: &Key, _duration: Duration) {}

    /// Called when resolving a service failed.
    fn resolution_failed(&self, _key: &Key, _error: &DiError) {}

    /// Called after a cached instance was released.
    fn released(&self, _key: &Key) {}

    /// Called when a release hook returned an error or panicked.
    fn release_failed(&self, _key: &Key, _message: &str) {}
}

/// Registered observers of one container.
#[derive(Default)]
pub(crate) struct Observers {
    observers: RwLock<Vec<Arc<dyn DiObserver>>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&self, observer: Arc<dyn DiObserver>) {
        self.observers.write().push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.read().is_empty()
    }

    // Snapshot so callbacks never run under the lock
    fn snapshot(&self) -> Vec<Arc<dyn DiObserver>> {
        self.observers.read().clone()
    }

    pub(crate) fn resolving(&self, key: &Key) {
        for observer in self.snapshot() {
            observer.resolving(key);
        }
    }

    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in self.snapshot() {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn resolution_failed(&self, key: &Key, error: &DiError) {
        for observer in self.snapshot() {
            observer.resolution_failed(key, error);
        }
    }

    pub(crate) fn released(&self, key: &Key) {
        if !self.has_observers() {
            return;
        }
        for observer in self.snapshot() {
            observer.released(key);
        }
    }

    pub(crate) fn release_failed(&self, key: &Key, message: &str) {
        if !self.has_observers() {
            return;
        }
        for observer in self.snapshot() {
            observer.release_failed(key, message);
        }
    }
}

/// Observer that forwards every event to `tracing`.
///
/// Resolutions are emitted at `TRACE`, completions at `DEBUG` and failures
/// at `WARN`, all under the `ferrule` target.
///
/// # Examples
///
/// ```
/// use ferrule::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(LoggingObserver::new()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct LoggingObserver {
    prefix: Option<String>,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prefix to every message, handy when several containers log to
    /// the same subscriber.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(target: "ferrule", service = key.display_name(), "{}resolving", self.prefix());
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(
            target: "ferrule",
            service = key.display_name(),
            elapsed_us = duration.as_micros() as u64,
            "{}resolved",
            self.prefix()
        );
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(target: "ferrule", service = key.display_name(), %error, "{}resolution failed", self.prefix());
    }

    fn released(&self, key: &Key) {
        tracing::debug!(target: "ferrule", service = key.display_name(), "{}released", self.prefix());
    }

    fn release_failed(&self, key: &Key, message: &str) {
        tracing::warn!(target: "ferrule", service = key.display_name(), message, "{}release failed", self.prefix());
    }
}
