/// Unit tests for DiError and DiResult types

use ferrule::{DiError, DiResult, Lifetime, ReleaseFailure};
use std::error::Error;

#[test]
fn test_error_display_not_registered() {
    let error = DiError::NotRegistered("TestService");
    assert_eq!(error.to_string(), "Service not registered: TestService");
}

#[test]
fn test_error_display_duplicate() {
    let error = DiError::DuplicateRegistration("TestService");
    assert_eq!(error.to_string(), "Service already registered: TestService");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("alloc::string::String");
    assert_eq!(error.to_string(), "Type mismatch for: alloc::string::String");
}

#[test]
fn test_error_display_circular() {
    let error = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
    assert_eq!(error.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
}

#[test]
fn test_error_display_wrong_lifetime() {
    let error = DiError::WrongLifetime {
        service: "Session",
        lifetime: Lifetime::Scoped,
        reason: "scoped services can only be resolved from a scope",
    };
    assert_eq!(
        error.to_string(),
        "Lifetime error for Session (Scoped): scoped services can only be resolved from a scope"
    );
}

#[test]
fn test_error_display_depth_exceeded() {
    assert_eq!(DiError::DepthExceeded(100).to_string(), "Max depth 100 exceeded");
}

#[test]
fn test_error_display_scope_errors() {
    assert_eq!(DiError::ScopeClosed.to_string(), "Scope has been closed");
    assert_eq!(DiError::ContainerDropped.to_string(), "Owning container has been dropped");
    assert_eq!(DiError::Released("Pool").to_string(), "Service instance has been released: Pool");
}

#[test]
fn test_error_display_release_failures() {
    let error = DiError::Release(vec![
        ReleaseFailure { service: "Cache", message: "disk full".to_string() },
        ReleaseFailure { service: "Pool", message: "panicked: boom".to_string() },
    ]);
    assert_eq!(
        error.to_string(),
        "2 release failure(s): failed to release Cache: disk full; failed to release Pool: panicked: boom"
    );
}

#[test]
fn test_diresult_ok_and_err() {
    let ok: DiResult<i32> = Ok(42);
    assert_eq!(ok.unwrap(), 42);

    let err: DiResult<i32> = Err(DiError::NotRegistered("X"));
    assert!(matches!(err, Err(DiError::NotRegistered("X"))));
}

#[test]
fn test_error_clone() {
    let error = DiError::Circular(vec!["A", "B"]);
    let cloned = error.clone();
    assert_eq!(error.to_string(), cloned.to_string());
}

#[test]
fn test_error_as_std_error() {
    let error: Box<dyn Error + Send + Sync> = Box::new(DiError::NotRegistered("Svc"));
    assert!(error.source().is_none());
    assert_eq!(error.to_string(), "Service not registered: Svc");

    let failure = ReleaseFailure { service: "Svc", message: "oops".to_string() };
    let as_error: &dyn Error = &failure;
    assert_eq!(as_error.to_string(), "failed to release Svc: oops");
}
