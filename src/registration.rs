//! Service registry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptors::{ReleaseHook, ServiceDescriptor};
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::options::DuplicatePolicy;

// Type-erased Arc for storage; always wraps an `Arc<S>` for the key's contract `S`
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

#[cfg(feature = "ahash")]
pub(crate) type FastMap<K, V> = HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type FastMap<K, V> = HashMap<K, V>;

/// Service registry holding one descriptor per identity.
///
/// Descriptors are shared out as `Arc`s so callers can drop the registry lock
/// before running a factory.
#[derive(Default)]
pub(crate) struct Registry {
    entries: FastMap<Key, Arc<ServiceDescriptor>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a descriptor, honoring the duplicate policy.
    pub(crate) fn insert(&mut self, descriptor: ServiceDescriptor, policy: DuplicatePolicy) -> DiResult<()> {
        let key = *descriptor.key();
        if policy == DuplicatePolicy::Reject && self.entries.contains_key(&key) {
            return Err(DiError::DuplicateRegistration(key.display_name()));
        }
        self.entries.insert(key, Arc::new(descriptor));
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<Arc<ServiceDescriptor>> {
        self.entries.get(key).cloned()
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Attaches a release hook to an existing registration.
    pub(crate) fn set_release(&mut self, key: &Key, hook: ReleaseHook) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                let mut updated = ServiceDescriptor::clone(entry);
                updated.set_release(hook);
                *entry = Arc::new(updated);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Snapshot of all descriptors, sorted by contract name.
    pub(crate) fn descriptors(&self) -> Vec<ServiceDescriptor> {
        let mut all: Vec<ServiceDescriptor> = self.entries.values().map(|d| ServiceDescriptor::clone(d)).collect();
        all.sort_by(|a, b| a.key().cmp(b.key()));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lifetime;

    fn descriptor_for<S: Send + Sync + 'static>(value: S) -> ServiceDescriptor {
        ServiceDescriptor::instance(Arc::new(value))
    }

    #[test]
    fn reject_policy_keeps_first_registration() {
        let mut registry = Registry::new();
        registry.insert(descriptor_for(1u32), DuplicatePolicy::Reject).unwrap();

        let err = registry.insert(descriptor_for(2u32), DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, DiError::DuplicateRegistration("u32")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn replace_policy_overwrites() {
        let mut registry = Registry::new();
        registry.insert(descriptor_for(1u32), DuplicatePolicy::Replace).unwrap();
        registry
            .insert(
                ServiceDescriptor::factory::<u32, _>(Lifetime::Transient, |_| Ok(Arc::new(2))),
                DuplicatePolicy::Replace,
            )
            .unwrap();

        let entry = registry.get(&Key::of::<u32>()).unwrap();
        assert_eq!(entry.lifetime(), Lifetime::Transient);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn set_release_on_missing_key_is_rejected() {
        let mut registry = Registry::new();
        let hook: ReleaseHook = Arc::new(|_| Ok(()));
        assert!(!registry.set_release(&Key::of::<u8>(), hook.clone()));

        registry.insert(descriptor_for(7u8), DuplicatePolicy::Reject).unwrap();
        assert!(registry.set_release(&Key::of::<u8>(), hook));
        assert!(registry.get(&Key::of::<u8>()).unwrap().is_disposable());
    }

    #[test]
    fn descriptors_are_sorted_by_name() {
        let mut registry = Registry::new();
        registry.insert(descriptor_for(1u64), DuplicatePolicy::Reject).unwrap();
        registry.insert(descriptor_for(true), DuplicatePolicy::Reject).unwrap();

        let names: Vec<_> = registry.descriptors().iter().map(|d| d.type_name()).collect();
        assert_eq!(names, vec!["bool", "u64"]);
    }
}
