//! Error types for the dependency injection container.

use thiserror::Error;

use crate::lifetime::Lifetime;

/// Error returned by a [`Dispose`](crate::Dispose) implementation.
pub type DisposeError = Box<dyn std::error::Error + Send + Sync>;

/// Dependency injection errors
///
/// Represents the various error conditions that can occur during service
/// registration, resolution, or container teardown.
///
/// # Examples
///
/// ```rust
/// use ferrule::{Container, DiError, Resolver};
///
/// let container = Container::new();
/// match container.get::<String>() {
///     Err(DiError::NotRegistered(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrule::DiError;
///
/// let not_found = DiError::NotRegistered("MyService");
/// let circular = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
///
/// assert_eq!(not_found.to_string(), "Service not registered: MyService");
/// assert_eq!(circular.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// No registration exists for the requested identity
    #[error("Service not registered: {0}")]
    NotRegistered(&'static str),
    /// The identity is already registered and the duplicate policy rejects re-registration
    #[error("Service already registered: {0}")]
    DuplicateRegistration(&'static str),
    /// The registered lifetime cannot be served by the requesting context
    #[error("Lifetime error for {service} ({lifetime:?}): {reason}")]
    WrongLifetime {
        service: &'static str,
        lifetime: Lifetime,
        reason: &'static str,
    },
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// One or more release hooks failed during teardown or scope close
    #[error("{} release failure(s): {}", .0.len(), join_failures(.0))]
    Release(Vec<ReleaseFailure>),
    /// The scope was already closed
    #[error("Scope has been closed")]
    ScopeClosed,
    /// The container owning the scope no longer exists
    #[error("Owning container has been dropped")]
    ContainerDropped,
    /// A supplied instance was released on teardown and cannot be handed out again
    #[error("Service instance has been released: {0}")]
    Released(&'static str),
}

/// A single release hook that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to release {service}: {message}")]
pub struct ReleaseFailure {
    /// Display name of the service whose release failed
    pub service: &'static str,
    /// Error or panic message produced by the release hook
    pub message: String,
}

fn join_failures(failures: &[ReleaseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout ferrule.
pub type DiResult<T> = Result<T, DiError>;
