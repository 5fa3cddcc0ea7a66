//! Constructor injection.
//!
//! A service registered through an implementation form names its
//! dependencies as the parameters of an ordinary function. Each parameter
//! type implements [`Inject`] and is resolved, left to right, from the same
//! context the service itself is being built in.

use std::sync::Arc;

use crate::container::ResolverContext;
use crate::error::DiResult;
use crate::traits::Resolver;

/// A value that can be resolved as a constructor argument.
///
/// - `Arc<S>` requires `S` to be registered.
/// - `Option<Arc<S>>` yields `None` when `S` is not registered.
pub trait Inject: Sized + 'static {
    /// Resolves the argument from the current context.
    fn inject(resolver: &ResolverContext<'_>) -> DiResult<Self>;
}

impl<S: ?Sized + Send + Sync + 'static> Inject for Arc<S> {
    fn inject(resolver: &ResolverContext<'_>) -> DiResult<Self> {
        resolver.get::<S>()
    }
}

impl<S: ?Sized + Send + Sync + 'static> Inject for Option<Arc<S>> {
    fn inject(resolver: &ResolverContext<'_>) -> DiResult<Self> {
        resolver.try_get::<S>()
    }
}

/// A function whose parameters can all be injected.
///
/// Implemented for every `Fn(A1, .., An) -> Out` with up to eight
/// [`Inject`] parameters, so constructors and closures can be registered
/// directly.
///
/// # Examples
///
/// ```rust
/// use ferrule::{Container, Resolver};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Cache;
/// struct Repository { config: Arc<Config>, cache: Option<Arc<Cache>> }
///
/// impl Repository {
///     fn new(config: Arc<Config>, cache: Option<Arc<Cache>>) -> Self {
///         Self { config, cache }
///     }
/// }
///
/// let container = Container::new();
/// container.add_instance(Config { url: "postgres://localhost".into() }).unwrap();
/// container.add_transient(Repository::new).unwrap();
///
/// let repo = container.get_required::<Repository>();
/// assert_eq!(repo.config.url, "postgres://localhost");
/// assert!(repo.cache.is_none());
/// ```
pub trait Constructor<Args>: Send + Sync + 'static {
    /// The constructed value
    type Output;

    /// Resolves every parameter and calls the function.
    fn construct(&self, resolver: &ResolverContext<'_>) -> DiResult<Self::Output>;
}

macro_rules! impl_constructor {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Constructor<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out + Send + Sync + 'static,
            $($arg: Inject,)*
        {
            type Output = Out;

            #[allow(non_snake_case, unused_variables)]
            fn construct(&self, resolver: &ResolverContext<'_>) -> DiResult<Out> {
                $(let $arg = <$arg as Inject>::inject(resolver)?;)*
                Ok((self)($($arg),*))
            }
        }
    };
}

impl_constructor!();
impl_constructor!(A1);
impl_constructor!(A1, A2);
impl_constructor!(A1, A2, A3);
impl_constructor!(A1, A2, A3, A4);
impl_constructor!(A1, A2, A3, A4, A5);
impl_constructor!(A1, A2, A3, A4, A5, A6);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7, A8);

