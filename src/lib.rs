//! # ferrule
//!
//! A small, thread-safe dependency injection container.
//!
//! ## Features
//!
//! - **Lifetimes**: Singleton, Scoped and Transient services
//! - **Constructor injection**: register plain functions and closures; their
//!   `Arc<T>` parameters are resolved recursively
//! - **Trait contracts**: resolve `dyn Trait` services
//! - **Exactly-once caching**: concurrent first requests construct one instance
//! - **Cycle detection**: circular graphs fail with the full dependency path
//! - **Ordered release**: disposable instances are released newest first
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrule::{Container, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//! container
//!     .add_instance(Database {
//!         connection_string: "postgres://localhost".to_string(),
//!     })
//!     .unwrap();
//! container.add_transient(|db: Arc<Database>| UserService { db }).unwrap();
//!
//! let user_service = container.get_required::<UserService>();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: Created once and shared across the entire container
//! - **Scoped**: Created once per [`Scope`]; cannot be resolved at root level
//! - **Transient**: Created fresh on every resolution
//!
//! ## Trait Resolution
//!
//! ```rust
//! use ferrule::{Container, Resolver};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) {
//!         println!("[LOG] {}", message);
//!     }
//! }
//!
//! let container = Container::new();
//! container.add_instance_trait::<dyn Logger>(Arc::new(ConsoleLogger)).unwrap();
//!
//! let logger = container.get_required::<dyn Logger>();
//! logger.log("Hello, World!");
//! ```
//!
//! ## Scoped Services
//!
//! ```rust
//! use ferrule::{Container, DiError, Resolver};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! struct RequestId(String);
//!
//! let container = Container::new();
//! let counter = Arc::new(AtomicUsize::new(0));
//! let c = counter.clone();
//! container
//!     .add_scoped_factory(move |_| {
//!         let n = c.fetch_add(1, Ordering::SeqCst) + 1;
//!         Ok(RequestId(format!("req-{}", n)))
//!     })
//!     .unwrap();
//!
//! let scope1 = container.create_scope();
//! let scope2 = container.create_scope();
//!
//! assert_eq!(scope1.get_required::<RequestId>().0, "req-1");
//! assert_eq!(scope2.get_required::<RequestId>().0, "req-2");
//!
//! // No scope, no scoped services
//! assert!(matches!(container.get::<RequestId>(), Err(DiError::WrongLifetime { .. })));
//! ```

pub mod container;
pub mod descriptors;
pub mod error;
pub mod inject;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod options;
pub mod traits;

// Internal modules
mod internal;
mod registration;
mod store;

pub use container::{Container, Registered, ResolverContext, Scope};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult, DisposeError, ReleaseFailure};
pub use inject::{Constructor, Inject};
pub use key::{key_of, Key};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver};
pub use options::{ContainerOptions, DuplicatePolicy};
pub use traits::{Dispose, Resolver, ResolverCore};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_singleton_resolution() {
        let container = Container::new();
        container.add_instance(42usize).unwrap();

        let a = container.get_required::<usize>();
        let b = container.get_required::<usize>();

        assert_eq!(*a, 42);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_transient_resolution() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();

        container
            .add_transient_factory(move |_| Ok(format!("instance-{}", c.fetch_add(1, Ordering::SeqCst) + 1)))
            .unwrap();

        let a = container.get_required::<String>();
        let b = container.get_required::<String>();

        assert_eq!(a.as_str(), "instance-1");
        assert_eq!(b.as_str(), "instance-2");
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_scoped_resolution() {
        let container = Container::new();
        container.add_scoped(|| String::from("scoped")).unwrap();

        let scope1 = container.create_scope();
        let s1a = scope1.get_required::<String>();
        let s1b = scope1.get_required::<String>();
        assert!(Arc::ptr_eq(&s1a, &s1b));

        let scope2 = container.create_scope();
        let s2 = scope2.get_required::<String>();
        assert!(!Arc::ptr_eq(&s1a, &s2));
    }

    #[test]
    fn test_trait_resolution() {
        trait TestTrait: Send + Sync {
            fn get_value(&self) -> i32;
        }

        struct TestImpl {
            value: i32,
        }

        impl TestTrait for TestImpl {
            fn get_value(&self) -> i32 {
                self.value
            }
        }

        let container = Container::new();
        container
            .add_singleton_trait::<dyn TestTrait, _, _>(|| -> Arc<dyn TestTrait> { Arc::new(TestImpl { value: 42 }) })
            .unwrap();

        let service = container.get_required::<dyn TestTrait>();
        assert_eq!(service.get_value(), 42);
        assert!(Arc::ptr_eq(&service, &container.get_required::<dyn TestTrait>()));
    }

    #[test]
    fn test_debug_output_summarizes_state() {
        let container = Container::new();
        container.add_instance(1u8).unwrap();
        container.get_required::<u8>();

        let scope = container.create_scope();
        let rendered = format!("{:?} {:?}", container, scope);
        assert!(rendered.contains("registrations: 1"));
        assert!(rendered.contains("singletons: 1"));
        assert!(rendered.contains("closed: false"));
    }
}
