//! Service descriptors: identity, lifetime and construction recipe.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::container::ResolverContext;
use crate::error::{DiError, DiResult, DisposeError};
use crate::inject::Constructor;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::AnyArc;
use crate::traits::Dispose;

pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;
pub(crate) type ReleaseHook = Arc<dyn Fn(&AnyArc) -> Result<(), DisposeError> + Send + Sync>;

/// Recipe for one service contract.
///
/// A descriptor is immutable once registered and owned by the container's
/// registry. It is usually created for you by the `Container::add_*` methods;
/// build one directly to register through [`Container::register`](crate::Container::register).
///
/// # Examples
///
/// ```rust
/// use ferrule::{Container, Lifetime, Resolver, ServiceDescriptor};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
///
/// let container = Container::new();
/// container
///     .register(ServiceDescriptor::factory::<Config, _>(Lifetime::Singleton, |_| {
///         Ok(Arc::new(Config { port: 8080 }))
///     }))
///     .unwrap();
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors.len(), 1);
/// assert_eq!(descriptors[0].lifetime(), Lifetime::Singleton);
/// assert!(descriptors[0].type_name().ends_with("Config"));
/// assert_eq!(container.get_required::<Config>().port, 8080);
/// ```
#[derive(Clone)]
pub struct ServiceDescriptor {
    key: Key,
    lifetime: Lifetime,
    pub(crate) factory: Ctor,
    pub(crate) release: Option<ReleaseHook>,
    impl_type_name: Option<&'static str>,
    // Set once a supplied instance has been released
    retired: Option<Arc<AtomicBool>>,
}

impl ServiceDescriptor {
    /// Singleton descriptor that hands out the given instance.
    ///
    /// If the registration is disposable, the instance is released on
    /// teardown like any other singleton. The container cannot build a
    /// replacement, so later requests fail with [`DiError::Released`].
    pub fn instance<S>(instance: Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let retired = Arc::new(AtomicBool::new(false));
        let flag = retired.clone();
        let ctor = erase(move |_| {
            if flag.load(Ordering::Acquire) {
                return Err(DiError::Released(Key::of::<S>().display_name()));
            }
            Ok(Arc::new(instance.clone()) as AnyArc)
        });
        let mut descriptor = Self::from_parts(Key::of::<S>(), Lifetime::Singleton, ctor);
        descriptor.retired = Some(retired);
        descriptor
    }

    /// Descriptor whose instances come from a factory closure.
    ///
    /// The factory receives a [`ResolverContext`] bound to the context the
    /// service is being resolved in, and may resolve its own dependencies
    /// from it.
    pub fn factory<S, F>(lifetime: Lifetime, factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> DiResult<Arc<S>> + Send + Sync + 'static,
    {
        let ctor = erase(move |r| Ok(Arc::new(factory(r)?) as AnyArc));
        Self::from_parts(Key::of::<S>(), lifetime, ctor)
    }

    /// Descriptor whose instances come from a constructor function.
    ///
    /// Every parameter of `ctor` is resolved from the container before the
    /// call; see [`Constructor`].
    pub fn constructor<S, Args, F>(lifetime: Lifetime, ctor: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        Args: 'static,
        F: Constructor<Args, Output = Arc<S>>,
    {
        Self::factory::<S, _>(lifetime, move |r| ctor.construct(r))
    }

    pub(crate) fn from_parts(key: Key, lifetime: Lifetime, factory: Ctor) -> Self {
        Self {
            key,
            lifetime,
            factory,
            release: None,
            impl_type_name: None,
            retired: None,
        }
    }

    /// Attaches the release hook. For supplied instances the hook also
    /// retires the instance so it is never handed out after release.
    pub(crate) fn set_release(&mut self, hook: ReleaseHook) {
        let hook: ReleaseHook = match self.retired.clone() {
            Some(retired) => Arc::new(move |any: &AnyArc| {
                retired.store(true, Ordering::Release);
                hook(any)
            }),
            None => hook,
        };
        self.release = Some(hook);
    }

    pub(crate) fn with_impl_type<I: 'static>(mut self) -> Self {
        self.impl_type_name = Some(std::any::type_name::<I>());
        self
    }

    /// Identity this descriptor is registered under
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Service lifetime
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Contract type or trait name
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Implementation type name, when registered through a concrete-type form
    pub fn impl_type_name(&self) -> Option<&'static str> {
        self.impl_type_name
    }

    /// Whether cached instances are released on teardown or scope close
    pub fn is_disposable(&self) -> bool {
        self.release.is_some()
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("key", &self.key.display_name())
            .field("lifetime", &self.lifetime)
            .field("impl_type_name", &self.impl_type_name)
            .field("disposable", &self.is_disposable())
            .finish()
    }
}

fn erase<F>(f: F) -> Ctor
where
    F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Release hook that calls [`Dispose::dispose`] on the stored `Arc<S>`.
pub(crate) fn dispose_hook<S>() -> ReleaseHook
where
    S: ?Sized + Dispose,
{
    Arc::new(|any: &AnyArc| match any.downcast_ref::<Arc<S>>() {
        Some(service) => service.dispose(),
        None => Err(format!("stored instance is not a {}", std::any::type_name::<S>()).into()),
    })
}
