//! Instance caches for cached lifetimes.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult, ReleaseFailure};
use crate::internal::DisposeBag;
use crate::key::Key;
use crate::observer::Observers;
use crate::registration::{AnyArc, FastMap};

/// Cache of instances for one context: the container's singletons or one
/// scope's scoped services.
///
/// Each key gets its own `OnceCell`, so at most one construction per key
/// ever succeeds even when many threads race on a cold entry. Threads
/// resolving different keys never wait on each other's factories; the map
/// lock is only held long enough to fetch the cell.
#[derive(Default)]
pub(crate) struct LifetimeStore {
    cells: Mutex<FastMap<Key, Arc<OnceCell<AnyArc>>>>,
    releases: Mutex<Releases>,
}

#[derive(Default)]
struct Releases {
    bag: DisposeBag,
    // No instance may be cached once set
    sealed: bool,
}

impl LifetimeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instance for `descriptor`, constructing it with
    /// `create` on first use.
    ///
    /// A failed construction caches nothing; the next request retries. The
    /// release hook, if any, is recorded together with the instance. An
    /// instance finished after the store was sealed is released on the spot
    /// and the request fails with [`DiError::ScopeClosed`].
    pub(crate) fn get_or_create<F>(
        &self,
        descriptor: &ServiceDescriptor,
        observers: &Observers,
        create: F,
    ) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        let key = *descriptor.key();
        let cell = {
            let mut cells = self.cells.lock();
            cells.entry(key).or_insert_with(|| Arc::new(OnceCell::new())).clone()
        };

        let instance = cell.get_or_try_init(|| {
            let instance = create()?;
            let mut releases = self.releases.lock();
            if releases.sealed {
                drop(releases);
                tracing::debug!(service = key.display_name(), "instance finished after close, releasing");
                if let Some(hook) = descriptor.release.clone() {
                    let mut late = DisposeBag::default();
                    late.push(key, Box::new(move || hook(&instance)));
                    late.run_all_reverse(observers);
                }
                return Err(DiError::ScopeClosed);
            }
            if let Some(hook) = descriptor.release.clone() {
                let held = instance.clone();
                releases.bag.push(key, Box::new(move || hook(&held)));
            }
            tracing::trace!(service = key.display_name(), lifetime = ?descriptor.lifetime(), "cached new instance");
            Ok(instance)
        })?;

        Ok(instance.clone())
    }

    /// Number of cached instances
    pub(crate) fn len(&self) -> usize {
        self.cells.lock().values().filter(|cell| cell.get().is_some()).count()
    }

    /// Number of release hooks still pending
    pub(crate) fn pending_releases(&self) -> usize {
        self.releases.lock().bag.len()
    }

    /// Forgets every cached instance and runs the release hooks newest first.
    /// The store stays usable.
    pub(crate) fn release_all(&self, observers: &Observers) -> Vec<ReleaseFailure> {
        self.release(observers, false)
    }

    /// Like [`release_all`](Self::release_all), but later constructions are
    /// refused.
    pub(crate) fn seal(&self, observers: &Observers) -> Vec<ReleaseFailure> {
        self.release(observers, true)
    }

    fn release(&self, observers: &Observers, seal: bool) -> Vec<ReleaseFailure> {
        let cached = std::mem::take(&mut *self.cells.lock());
        let mut bag = {
            let mut releases = self.releases.lock();
            releases.sealed |= seal;
            std::mem::take(&mut releases.bag)
        };
        let failures = bag.run_all_reverse(observers);
        // Instances are dropped only after their hooks ran
        drop(cached);
        failures
    }
}
