//! Scoped resolution.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::{ContainerInner, ResolverContext};
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionGuard;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::Observers;
use crate::registration::AnyArc;
use crate::store::LifetimeStore;
use crate::traits::{Resolver, ResolverCore};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// A bounded context that owns one cache of scoped instances.
///
/// Singletons resolved through a scope come from the container; scoped
/// services are created at most once per scope; transients are built fresh
/// and may depend on the scope's scoped services.
///
/// Closing the scope (explicitly or by dropping it) releases its disposable
/// scoped instances in reverse creation order. A scope only holds a weak
/// reference to its container.
///
/// # Examples
///
/// ```
/// use ferrule::{Container, Resolver};
/// use std::sync::Arc;
///
/// struct DatabaseConnection(String);
/// struct UserService { db: Arc<DatabaseConnection> }
///
/// let container = Container::new();
/// container.add_scoped(|| DatabaseConnection("conn".to_string())).unwrap();
/// container.add_transient(|db: Arc<DatabaseConnection>| UserService { db }).unwrap();
///
/// let scope = container.create_scope();
/// let a = scope.get_required::<UserService>();
/// let b = scope.get_required::<UserService>();
///
/// // Transient services differ, the scoped connection is shared
/// assert!(!Arc::ptr_eq(&a, &b));
/// assert!(Arc::ptr_eq(&a.db, &b.db));
/// scope.close().unwrap();
/// ```
pub struct Scope {
    id: u64,
    root: Weak<ContainerInner>,
    scoped: LifetimeStore,
    closed: AtomicBool,
}

impl Scope {
    pub(crate) fn new(root: &Arc<ContainerInner>) -> Self {
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(scope_id = id, "scope created");
        Self {
            id,
            root: Arc::downgrade(root),
            scoped: LifetimeStore::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Process-unique identifier, useful in logs
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn root(&self) -> DiResult<Arc<ContainerInner>> {
        if self.is_closed() {
            return Err(DiError::ScopeClosed);
        }
        self.root.upgrade().ok_or(DiError::ContainerDropped)
    }

    /// Resolves a service that must be registered as scoped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrule::{Container, DiError};
    ///
    /// struct Session;
    /// struct Settings;
    ///
    /// let container = Container::new();
    /// container.add_scoped(|| Session).unwrap();
    /// container.add_singleton(|| Settings).unwrap();
    ///
    /// let scope = container.create_scope();
    /// assert!(scope.get_scoped::<Session>().is_ok());
    /// assert!(matches!(scope.get_scoped::<Settings>(), Err(DiError::WrongLifetime { .. })));
    /// ```
    pub fn get_scoped<S: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<S>> {
        let key = Key::of::<S>();
        let lifetime = self.root()?.lookup(&key)?.lifetime();
        if lifetime != Lifetime::Scoped {
            return Err(DiError::WrongLifetime {
                service: key.display_name(),
                lifetime,
                reason: "requested as scoped but registered with another lifetime",
            });
        }
        self.get::<S>()
    }

    /// Releases every disposable scoped instance, newest first.
    ///
    /// Every release hook runs even if earlier ones fail; the failures are
    /// reported together. Closing an already closed scope does nothing.
    pub fn close(&self) -> DiResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let failures = match self.root.upgrade() {
            Some(root) => self.scoped.seal(&root.observers),
            None => self.scoped.seal(&Observers::new()),
        };
        tracing::debug!(scope_id = self.id, failures = failures.len(), "scope closed");

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DiError::Release(failures))
        }
    }

    fn resolve_in_scope(&self, key: &Key) -> DiResult<AnyArc> {
        let root = self.root()?;
        root.observe(key, || {
            let _guard = ResolutionGuard::enter(key, root.options.max_depth)?;
            let descriptor = root.lookup(key)?;
            match descriptor.lifetime() {
                Lifetime::Singleton => root.resolve_singleton(&descriptor),
                Lifetime::Scoped => self.scoped.get_or_create(&descriptor, &root.observers, || {
                    (descriptor.factory)(&ResolverContext::new(self))
                }),
                Lifetime::Transient => (descriptor.factory)(&ResolverContext::new(self)),
            }
        })
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolve_in_scope(key)
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Err(e) = self.close() {
            tracing::warn!(scope_id = self.id, error = %e, "scope dropped with failing release hooks");
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .field("cached", &self.scoped.len())
            .field("pending_releases", &self.scoped.pending_releases())
            .finish()
    }
}
