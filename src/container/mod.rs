//! The container: registration, root resolution, scopes and teardown.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionGuard;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, Observers};
use crate::options::ContainerOptions;
use crate::registration::{AnyArc, Registry};
use crate::store::LifetimeStore;
use crate::traits::{Resolver, ResolverCore};

mod context;
mod register;
mod scope;

pub use context::ResolverContext;
pub use register::Registered;
pub use scope::Scope;

/// Dependency injection container.
///
/// Holds the registry of service descriptors and the singleton cache, and
/// resolves services at root level. Scoped services need a [`Scope`],
/// created with [`create_scope`](Container::create_scope).
///
/// `Container` is a cheap handle: clones share the same registry and
/// singletons. When the last handle is dropped any disposable singletons
/// still cached are released.
///
/// # Examples
///
/// ```
/// use ferrule::{Container, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let container = Container::new();
/// container.add_instance(Database { url: "postgres://localhost".to_string() }).unwrap();
/// container.add_transient(|db: Arc<Database>| UserService { db }).unwrap();
///
/// let user_service = container.resolve::<UserService>().unwrap();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    registry: RwLock<Registry>,
    singletons: LifetimeStore,
    observers: Observers,
    options: ContainerOptions,
}

impl ContainerInner {
    fn lookup(&self, key: &Key) -> DiResult<Arc<ServiceDescriptor>> {
        self.registry
            .read()
            .get(key)
            .ok_or(DiError::NotRegistered(key.display_name()))
    }

    /// Runs `resolve` under the observers' resolving/resolved hooks.
    #[inline]
    fn observe<F>(&self, key: &Key, resolve: F) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        if !self.observers.has_observers() {
            return resolve();
        }

        let start = Instant::now();
        self.observers.resolving(key);
        let result = resolve();
        match &result {
            Ok(_) => self.observers.resolved(key, start.elapsed()),
            Err(e) => self.observers.resolution_failed(key, e),
        }
        result
    }

    /// Singletons are always built in root context, whoever asks first.
    fn resolve_singleton(&self, descriptor: &ServiceDescriptor) -> DiResult<AnyArc> {
        self.singletons.get_or_create(descriptor, &self.observers, || {
            (descriptor.factory)(&ResolverContext::new(self))
        })
    }

    fn resolve_root(&self, key: &Key) -> DiResult<AnyArc> {
        self.observe(key, || {
            let _guard = ResolutionGuard::enter(key, self.options.max_depth)?;
            let descriptor = self.lookup(key)?;
            match descriptor.lifetime() {
                Lifetime::Singleton => self.resolve_singleton(&descriptor),
                Lifetime::Transient => (descriptor.factory)(&ResolverContext::new(self)),
                Lifetime::Scoped => Err(DiError::WrongLifetime {
                    service: key.display_name(),
                    lifetime: Lifetime::Scoped,
                    reason: "scoped services can only be resolved from a scope",
                }),
            }
        })
    }
}

impl ResolverCore for ContainerInner {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolve_root(key)
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        let failures = self.singletons.release_all(&self.observers);
        for failure in failures {
            tracing::warn!(service = failure.service, message = %failure.message, "release failed while dropping container");
        }
    }
}

impl Container {
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    pub fn with_options(mut options: ContainerOptions) -> Self {
        // At least the requested service itself
        options.max_depth = options.max_depth.max(1);
        tracing::debug!(max_depth = options.max_depth, duplicates = %options.duplicates, "container created");
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(Registry::new()),
                singletons: LifetimeStore::new(),
                observers: Observers::new(),
                options,
            }),
        }
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// Adds an observer that is notified of every resolution and release.
    pub fn add_observer(&self, observer: Arc<dyn DiObserver>) {
        self.inner.observers.add(observer);
    }

    /// Resolves a service at root level.
    ///
    /// Equivalent to [`Resolver::get`]; scoped services fail with
    /// [`DiError::WrongLifetime`].
    pub fn resolve<S: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<S>> {
        self.get::<S>()
    }

    /// Whether a contract is registered.
    pub fn contains<S: ?Sized + 'static>(&self) -> bool {
        self.inner.registry.read().contains_key(&Key::of::<S>())
    }

    /// Snapshot of all registrations, sorted by contract name.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.inner.registry.read().descriptors()
    }

    /// Number of registered contracts
    pub fn len(&self) -> usize {
        self.inner.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a new scope with its own cache of scoped services.
    pub fn create_scope(&self) -> Scope {
        Scope::new(&self.inner)
    }

    /// Runs `f` inside a fresh scope and closes the scope afterwards.
    ///
    /// The scope is closed on every exit path. An error from `f` takes
    /// precedence over a release failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrule::{Container, DiError, Dispose, DisposeError, Resolver};
    /// use std::sync::atomic::{AtomicBool, Ordering};
    ///
    /// static CLOSED: AtomicBool = AtomicBool::new(false);
    ///
    /// struct FileHandle;
    /// impl Dispose for FileHandle {
    ///     fn dispose(&self) -> Result<(), DisposeError> {
    ///         CLOSED.store(true, Ordering::SeqCst);
    ///         Ok(())
    ///     }
    /// }
    ///
    /// # fn main() -> Result<(), DiError> {
    /// let container = Container::new();
    /// container.add_scoped(|| FileHandle)?.disposable();
    ///
    /// let result = container.using_scope(|scope| {
    ///     let _file = scope.get::<FileHandle>()?;
    ///     Ok::<_, DiError>("processed")
    /// })?;
    ///
    /// assert_eq!(result, "processed");
    /// assert!(CLOSED.load(Ordering::SeqCst));
    /// # Ok(())
    /// # }
    /// ```
    pub fn using_scope<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&Scope) -> Result<R, E>,
        E: From<DiError>,
    {
        let scope = self.create_scope();
        let result = f(&scope);
        let closed = scope.close();

        match (result, closed) {
            (Err(e), _) => Err(e),
            (Ok(_), Err(e)) => Err(e.into()),
            (Ok(value), Ok(())) => Ok(value),
        }
    }

    /// Releases every disposable singleton, newest first, and empties the
    /// singleton cache.
    ///
    /// All release hooks are attempted; failures are reported together as
    /// [`DiError::Release`]. Singletons resolved after teardown are built
    /// anew; a released disposable instance registered with
    /// [`add_instance`](Container::add_instance) fails with
    /// [`DiError::Released`] instead.
    pub fn teardown(&self) -> DiResult<()> {
        let failures = self.inner.singletons.release_all(&self.inner.observers);
        tracing::debug!(failures = failures.len(), "container torn down");
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DiError::Release(failures))
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.inner.resolve_root(key)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registrations", &self.len())
            .field("singletons", &self.inner.singletons.len())
            .field("pending_releases", &self.inner.singletons.pending_releases())
            .field("options", &self.inner.options)
            .finish()
    }
}
