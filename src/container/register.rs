//! Registration methods of [`Container`].

use std::marker::PhantomData;
use std::sync::Arc;

use super::{Container, ResolverContext};
use crate::descriptors::{dispose_hook, ServiceDescriptor};
use crate::error::DiResult;
use crate::inject::Constructor;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::traits::Dispose;

/// Handle to a registration that was just added.
///
/// Returned by every `add_*` method so the registration can be refined,
/// for example by attaching a release hook with
/// [`disposable`](Registered::disposable).
pub struct Registered<'c, S: ?Sized> {
    container: &'c Container,
    key: Key,
    lifetime: Lifetime,
    _contract: PhantomData<fn() -> Arc<S>>,
}

impl<'c, S: ?Sized + 'static> Registered<'c, S> {
    fn new(container: &'c Container, key: Key, lifetime: Lifetime) -> Self {
        Self {
            container,
            key,
            lifetime,
            _contract: PhantomData,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Releases cached instances of this service through [`Dispose`] when
    /// the container is torn down or the owning scope closes.
    ///
    /// Transient instances are never released by the container.
    pub fn disposable(self) -> Self
    where
        S: Dispose,
    {
        let attached = self.container.inner.registry.write().set_release(&self.key, dispose_hook::<S>());
        debug_assert!(attached, "registration vanished before release hook was attached");
        self
    }
}

impl Container {
    fn insert<S: ?Sized + 'static>(&self, descriptor: ServiceDescriptor) -> DiResult<Registered<'_, S>> {
        let key = *descriptor.key();
        let lifetime = descriptor.lifetime();
        self.inner.registry.write().insert(descriptor, self.inner.options.duplicates)?;
        tracing::debug!(service = key.display_name(), ?lifetime, "registered service");
        Ok(Registered::new(self, key, lifetime))
    }

    fn add_constructed<T, Args, F>(&self, lifetime: Lifetime, ctor: F) -> DiResult<Registered<'_, T>>
    where
        T: Send + Sync + 'static,
        Args: 'static,
        F: Constructor<Args, Output = T>,
    {
        let descriptor = ServiceDescriptor::factory::<T, _>(lifetime, move |r| ctor.construct(r).map(Arc::new));
        self.insert(descriptor.with_impl_type::<T>())
    }

    fn add_produced<T, F>(&self, lifetime: Lifetime, factory: F) -> DiResult<Registered<'_, T>>
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        let descriptor = ServiceDescriptor::factory::<T, _>(lifetime, move |r| factory(r).map(Arc::new));
        self.insert(descriptor.with_impl_type::<T>())
    }

    /// Registers a descriptor built by hand.
    pub fn register(&self, descriptor: ServiceDescriptor) -> DiResult<()> {
        let key = *descriptor.key();
        let lifetime = descriptor.lifetime();
        self.inner.registry.write().insert(descriptor, self.inner.options.duplicates)?;
        tracing::debug!(service = key.display_name(), ?lifetime, "registered descriptor");
        Ok(())
    }

    // ----- Instance forms -----

    /// Registers an existing value as a singleton.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrule::{Container, DiError};
    ///
    /// let container = Container::new();
    /// container.add_instance(8080u16).unwrap();
    ///
    /// let duplicate = container.add_instance(9090u16);
    /// assert!(matches!(duplicate, Err(DiError::DuplicateRegistration(_))));
    /// ```
    pub fn add_instance<T: Send + Sync + 'static>(&self, value: T) -> DiResult<Registered<'_, T>> {
        self.insert(ServiceDescriptor::instance(Arc::new(value)).with_impl_type::<T>())
    }

    /// Registers an existing instance under a trait (or any unsized) contract.
    pub fn add_instance_trait<S: ?Sized + Send + Sync + 'static>(&self, instance: Arc<S>) -> DiResult<Registered<'_, S>> {
        self.insert(ServiceDescriptor::instance(instance))
    }

    // ----- Implementation forms -----

    /// Registers a singleton built by `ctor`, whose parameters are resolved
    /// from the container.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrule::{Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Settings { name: &'static str }
    /// struct Greeter { settings: Arc<Settings> }
    ///
    /// let container = Container::new();
    /// container.add_singleton(|| Settings { name: "world" }).unwrap();
    /// container.add_singleton(|settings: Arc<Settings>| Greeter { settings }).unwrap();
    ///
    /// let a = container.get_required::<Greeter>();
    /// let b = container.get_required::<Greeter>();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// assert_eq!(a.settings.name, "world");
    /// ```
    pub fn add_singleton<T, Args, F>(&self, ctor: F) -> DiResult<Registered<'_, T>>
    where
        T: Send + Sync + 'static,
        Args: 'static,
        F: Constructor<Args, Output = T>,
    {
        self.add_constructed(Lifetime::Singleton, ctor)
    }

    /// Registers a scoped service built by `ctor`.
    pub fn add_scoped<T, Args, F>(&self, ctor: F) -> DiResult<Registered<'_, T>>
    where
        T: Send + Sync + 'static,
        Args: 'static,
        F: Constructor<Args, Output = T>,
    {
        self.add_constructed(Lifetime::Scoped, ctor)
    }

    /// Registers a transient service built by `ctor` on every request.
    pub fn add_transient<T, Args, F>(&self, ctor: F) -> DiResult<Registered<'_, T>>
    where
        T: Send + Sync + 'static,
        Args: 'static,
        F: Constructor<Args, Output = T>,
    {
        self.add_constructed(Lifetime::Transient, ctor)
    }

    /// Registers a singleton trait implementation built by `ctor`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrule::{Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// trait Clock: Send + Sync {
    ///     fn now(&self) -> u64;
    /// }
    ///
    /// struct FixedClock;
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> u64 { 42 }
    /// }
    ///
    /// let container = Container::new();
    /// container
    ///     .add_singleton_trait::<dyn Clock, _, _>(|| -> Arc<dyn Clock> { Arc::new(FixedClock) })
    ///     .unwrap();
    ///
    /// assert_eq!(container.get_required::<dyn Clock>().now(), 42);
    /// ```
    pub fn add_singleton_trait<S, Args, F>(&self, ctor: F) -> DiResult<Registered<'_, S>>
    where
        S: ?Sized + Send + Sync + 'static,
        Args: 'static,
        F: Constructor<Args, Output = Arc<S>>,
    {
        self.insert(ServiceDescriptor::constructor(Lifetime::Singleton, ctor))
    }

    pub fn add_scoped_trait<S, Args, F>(&self, ctor: F) -> DiResult<Registered<'_, S>>
    where
        S: ?Sized + Send + Sync + 'static,
        Args: 'static,
        F: Constructor<Args, Output = Arc<S>>,
    {
        self.insert(ServiceDescriptor::constructor(Lifetime::Scoped, ctor))
    }

    pub fn add_transient_trait<S, Args, F>(&self, ctor: F) -> DiResult<Registered<'_, S>>
    where
        S: ?Sized + Send + Sync + 'static,
        Args: 'static,
        F: Constructor<Args, Output = Arc<S>>,
    {
        self.insert(ServiceDescriptor::constructor(Lifetime::Transient, ctor))
    }

    // ----- Factory forms -----

    /// Registers a singleton produced by a factory closure.
    ///
    /// The factory may fail; the error is returned to whoever requested the
    /// service and nothing is cached.
    pub fn add_singleton_factory<T, F>(&self, factory: F) -> DiResult<Registered<'_, T>>
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_produced(Lifetime::Singleton, factory)
    }

    /// Registers a scoped service produced by a factory closure.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrule::{Container, Resolver};
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::sync::Arc;
    ///
    /// struct RequestId(u32);
    ///
    /// let next = Arc::new(AtomicU32::new(1));
    /// let container = Container::new();
    /// container
    ///     .add_scoped_factory(move |_| Ok(RequestId(next.fetch_add(1, Ordering::Relaxed))))
    ///     .unwrap();
    ///
    /// let first = container.create_scope();
    /// let second = container.create_scope();
    /// assert_eq!(first.get_required::<RequestId>().0, 1);
    /// assert_eq!(first.get_required::<RequestId>().0, 1);
    /// assert_eq!(second.get_required::<RequestId>().0, 2);
    /// ```
    pub fn add_scoped_factory<T, F>(&self, factory: F) -> DiResult<Registered<'_, T>>
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_produced(Lifetime::Scoped, factory)
    }

    /// Registers a transient service produced by a factory closure.
    pub fn add_transient_factory<T, F>(&self, factory: F) -> DiResult<Registered<'_, T>>
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_produced(Lifetime::Transient, factory)
    }

    pub fn add_singleton_trait_factory<S, F>(&self, factory: F) -> DiResult<Registered<'_, S>>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> DiResult<Arc<S>> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(Lifetime::Singleton, factory))
    }

    pub fn add_scoped_trait_factory<S, F>(&self, factory: F) -> DiResult<Registered<'_, S>>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> DiResult<Arc<S>> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(Lifetime::Scoped, factory))
    }

    pub fn add_transient_trait_factory<S, F>(&self, factory: F) -> DiResult<Registered<'_, S>>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> DiResult<Arc<S>> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(Lifetime::Transient, factory))
    }
}
