//! Resolver traits for service resolution.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Core resolver trait for object-safe service resolution.
///
/// Handles the low-level mechanics: descriptor lookup, lifetime dispatch and
/// cycle detection. Returns instances as type-erased handles; the typed API
/// lives in [`Resolver`].
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service by key.
    ///
    /// # Returns
    ///
    /// * `Ok(handle)` - The resolved service; the handle wraps an `Arc<S>` for the key's contract `S`
    /// * `Err(DiError)` - Resolution error (not registered, wrong lifetime, circular, etc.)
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// `Container`, `Scope` and the `ResolverContext` handed to factories all
/// implement this trait, making them interchangeable for resolution within
/// their respective contexts. Contracts may be concrete types or trait
/// objects.
///
/// # Examples
///
/// ```
/// use ferrule::{Container, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str);
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) {
///         println!("LOG: {}", msg);
///     }
/// }
///
/// let container = Container::new();
/// container.add_instance(42usize).unwrap();
/// container.add_instance_trait::<dyn Logger>(Arc::new(ConsoleLogger)).unwrap();
///
/// let number = container.get_required::<usize>();
/// assert_eq!(*number, 42);
///
/// let logger = container.get_required::<dyn Logger>();
/// logger.log("Service resolved successfully");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a service contract.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrule::{Container, Resolver};
    ///
    /// let container = Container::new();
    /// container.add_instance("configuration".to_string()).unwrap();
    ///
    /// let config = container.get::<String>().unwrap();
    /// assert_eq!(&*config, "configuration");
    /// ```
    fn get<S: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<S>> {
        let key = Key::of::<S>();
        let any = self.resolve_any(&key)?;
        any.downcast_ref::<Arc<S>>()
            .cloned()
            .ok_or(DiError::TypeMismatch(key.display_name()))
    }

    /// Resolves a service contract, panicking on failure.
    ///
    /// Use this when the service is certainly registered and a configuration
    /// error should fail fast.
    fn get_required<S: ?Sized + Send + Sync + 'static>(&self) -> Arc<S> {
        self.get::<S>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<S>(), e))
    }

    /// Resolves a service contract if it is registered.
    ///
    /// `NotRegistered` for the requested contract itself becomes `Ok(None)`;
    /// every other failure, including a missing dependency further down the
    /// graph, is returned as an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrule::{Container, Resolver};
    ///
    /// let container = Container::new();
    /// assert!(container.try_get::<u64>().unwrap().is_none());
    /// ```
    fn try_get<S: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Option<Arc<S>>> {
        match self.get::<S>() {
            Ok(service) => Ok(Some(service)),
            Err(DiError::NotRegistered(name)) if name == std::any::type_name::<S>() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
