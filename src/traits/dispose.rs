//! Disposal trait for resource cleanup.

use crate::error::DisposeError;

/// Optional release capability for cached services.
///
/// Implement this trait for services that need structured teardown (flushing
/// caches, closing connections) and opt in when registering with
/// [`Registered::disposable`](crate::Registered::disposable). The container
/// calls `dispose` exactly once per cached instance when the owning store is
/// released: singletons on [`Container::teardown`](crate::Container::teardown),
/// scoped instances on [`Scope::close`](crate::Scope::close). Transient
/// instances are never disposed by the container.
///
/// Trait contracts can require it as a supertrait so that a `dyn Contract`
/// registration can be made disposable too.
///
/// # Examples
///
/// ```
/// use ferrule::{Container, Dispose, DisposeError, Resolver};
///
/// struct Cache {
///     name: String,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) -> Result<(), DisposeError> {
///         println!("Flushing cache: {}", self.name);
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// container
///     .add_singleton(|| Cache { name: "user_cache".to_string() })
///     .unwrap()
///     .disposable();
///
/// let _cache = container.get_required::<Cache>();
/// container.teardown().unwrap();
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self) -> Result<(), DisposeError>;
}
