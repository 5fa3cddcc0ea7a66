//! Resolution context handed to factories.

use crate::error::DiResult;
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Context passed to factory functions for resolving dependencies.
///
/// A `ResolverContext` is bound to the context the service is being built
/// in: the container for singletons and root-level transients, the scope
/// otherwise. Dependencies resolved through it follow the same lifetime
/// rules as the service itself, so a scoped factory sees the scope's
/// instances.
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
/// container
///     .add_transient_factory(|resolver| {
///         Ok(UserService { db: resolver.get::<Database>()? })
///     })
///     .unwrap();
///
/// let users = container.get_required::<UserService>();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }
}
