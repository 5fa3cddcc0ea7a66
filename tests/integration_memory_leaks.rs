/// Memory management integration tests
///
/// These tests verify that the container does not keep instances alive
/// longer than their owning context:
/// 1. Root singletons: dropped with the last container handle or on teardown
/// 2. Scoped services: dropped when the scope closes
/// 3. Transient services: owned solely by the caller

use ferrule::{Container, DiError, Resolver};
use std::sync::{Arc, Weak};

struct Payload {
    _data: Vec<u8>,
}

fn payload() -> Payload {
    Payload { _data: vec![0u8; 1024] }
}

#[test]
fn test_singleton_dropped_with_container() {
    let container = Container::new();
    container.add_singleton(payload).unwrap();

    let weak: Weak<Payload> = Arc::downgrade(&container.get_required::<Payload>());
    assert!(weak.upgrade().is_some());

    drop(container);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_singleton_dropped_on_teardown() {
    let container = Container::new();
    container.add_singleton(payload).unwrap();

    let weak = Arc::downgrade(&container.get_required::<Payload>());
    container.teardown().unwrap();
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_scoped_dropped_when_scope_closes() {
    let container = Container::new();
    container.add_scoped(payload).unwrap();

    let scope = container.create_scope();
    let weak = Arc::downgrade(&scope.get_required::<Payload>());
    assert!(weak.upgrade().is_some());

    scope.close().unwrap();
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_scope_does_not_keep_container_alive() {
    let container = Container::new();
    container.add_singleton(payload).unwrap();
    let weak = Arc::downgrade(&container.get_required::<Payload>());

    let scope = container.create_scope();
    drop(container);

    assert!(weak.upgrade().is_none());
    assert!(matches!(scope.get::<Payload>(), Err(DiError::ContainerDropped)));
}

#[test]
fn test_transient_owned_by_caller() {
    let container = Container::new();
    container.add_transient(payload).unwrap();

    let instance = container.get_required::<Payload>();
    let weak = Arc::downgrade(&instance);
    assert_eq!(Arc::strong_count(&instance), 1);

    drop(instance);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_failed_construction_caches_nothing() {
    struct Missing;
    struct NeedsMissing {
        _missing: Arc<Missing>,
        _payload: Arc<Payload>,
    }

    let container = Container::new();
    container.add_transient(payload).unwrap();
    container
        .add_singleton(|payload: Arc<Payload>, missing: Arc<Missing>| NeedsMissing {
            _missing: missing,
            _payload: payload,
        })
        .unwrap();

    assert!(container.get::<NeedsMissing>().is_err());
    assert!(format!("{:?}", container).contains("singletons: 0"));
}
