//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ferrule::{Container, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repository { db_url: String }
/// struct RequestModel { id: u32 }
///
/// let container = Container::new();
///
/// // Singleton: One instance for the whole container
/// container.add_instance(Database { url: "postgres://localhost".to_string() }).unwrap();
///
/// // Scoped: One instance per scope
/// container.add_scoped(|db: Arc<Database>| Repository { db_url: db.url.clone() }).unwrap();
///
/// // Transient: New instance every time
/// container.add_transient(|| RequestModel { id: 12345 }).unwrap();
///
/// let db1 = container.get_required::<Database>();
/// let scope1 = container.create_scope();
/// let db2 = scope1.get_required::<Database>();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// let repo1a = scope1.get_required::<Repository>();
/// let repo1b = scope1.get_required::<Repository>();
/// assert!(Arc::ptr_eq(&repo1a, &repo1b));
///
/// let scope2 = container.create_scope();
/// let repo2 = scope2.get_required::<Repository>();
/// assert!(!Arc::ptr_eq(&repo1a, &repo2));
///
/// let model1 = scope1.get_required::<RequestModel>();
/// let model2 = scope1.get_required::<RequestModel>();
/// assert!(!Arc::ptr_eq(&model1, &model2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per container, cached until teardown
    ///
    /// Created lazily on first resolution from the container or any of its
    /// scopes. The same instance is shared across all scopes and threads.
    Singleton,
    /// Single instance per scope, cached until the scope closes
    ///
    /// Multiple requests within one scope return the same instance, different
    /// scopes get different instances. Cannot be resolved from the container
    /// root.
    Scoped,
    /// New instance per resolution, never cached
    ///
    /// The container keeps no reference to transient instances and never
    /// releases them; their lifetime belongs to the caller.
    Transient,
}

impl Lifetime {
    /// Whether instances of this lifetime are cached by some store.
    pub fn is_cached(self) -> bool {
        !matches!(self, Lifetime::Transient)
    }
}
