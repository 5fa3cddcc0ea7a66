/// Property-based tests for service resolution
///
/// These tests verify that resolution behavior follows the lifetime rules
/// regardless of the specific values, registration order or resolution
/// sequence used.

use ferrule::{Container, DiError, DiResult, Lifetime, Resolver, ResolverContext};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ServiceA {
    value: String,
}

#[derive(Debug, Clone)]
struct ServiceB {
    number: u64,
}

fn lifetime_strategy() -> impl Strategy<Value = Lifetime> {
    prop_oneof![
        Just(Lifetime::Singleton),
        Just(Lifetime::Scoped),
        Just(Lifetime::Transient),
    ]
}

fn counted(counter: Arc<AtomicUsize>) -> impl Fn(&ResolverContext<'_>) -> DiResult<ServiceB> + Send + Sync + 'static {
    move |_| Ok(ServiceB { number: counter.fetch_add(1, Ordering::SeqCst) as u64 })
}

fn register_counted(container: &Container, lifetime: Lifetime, counter: Arc<AtomicUsize>) {
    match lifetime {
        Lifetime::Singleton => container.add_singleton_factory(counted(counter)).map(|_| ()),
        Lifetime::Scoped => container.add_scoped_factory(counted(counter)).map(|_| ()),
        Lifetime::Transient => container.add_transient_factory(counted(counter)).map(|_| ()),
    }
    .unwrap();
}

proptest! {
    #[test]
    fn singleton_resolution_consistency(service_value in "\\PC{0,50}", resolutions in 1usize..20) {
        let container = Container::new();
        container.add_instance(ServiceA { value: service_value.clone() }).unwrap();

        let first = container.get_required::<ServiceA>();
        for _ in 0..resolutions {
            let again = container.get_required::<ServiceA>();
            prop_assert!(Arc::ptr_eq(&first, &again));
        }
        prop_assert_eq!(&first.value, &service_value);
    }
}

proptest! {
    #[test]
    fn optional_resolution_behavior(register_service in any::<bool>()) {
        let container = Container::new();
        if register_service {
            container.add_instance(ServiceB { number: 42 }).unwrap();
        }

        let optional = container.try_get::<ServiceB>().unwrap();
        prop_assert_eq!(optional.is_some(), register_service);

        match container.get::<ServiceB>() {
            Ok(service) => prop_assert_eq!(service.number, 42),
            Err(DiError::NotRegistered(_)) => prop_assert!(!register_service),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

proptest! {
    #[test]
    fn construction_count_matches_lifetime(
        lifetime in lifetime_strategy(),
        scopes in 1usize..5,
        per_scope in 1usize..6,
    ) {
        let counter = Arc::new(AtomicUsize::new(0));
        let container = Container::new();
        register_counted(&container, lifetime, counter.clone());

        for _ in 0..scopes {
            let scope = container.create_scope();
            let first = scope.get_required::<ServiceB>();
            for _ in 1..per_scope {
                let again = scope.get_required::<ServiceB>();
                prop_assert_eq!(Arc::ptr_eq(&first, &again), lifetime != Lifetime::Transient);
            }
            scope.close().unwrap();
        }

        let expected = match lifetime {
            Lifetime::Singleton => 1,
            Lifetime::Scoped => scopes,
            Lifetime::Transient => scopes * per_scope,
        };
        prop_assert_eq!(counter.load(Ordering::SeqCst), expected);

        // Root level only serves singletons and transients
        let from_root = container.get::<ServiceB>();
        prop_assert_eq!(from_root.is_ok(), lifetime != Lifetime::Scoped);
    }
}

proptest! {
    #[test]
    fn duplicate_registration_always_rejected(first in lifetime_strategy(), second in lifetime_strategy()) {
        let container = Container::new();
        register_counted(&container, first, Arc::default());

        let outcome = match second {
            Lifetime::Singleton => container.add_singleton(|| ServiceB { number: 1 }).map(|_| ()),
            Lifetime::Scoped => container.add_scoped(|| ServiceB { number: 2 }).map(|_| ()),
            Lifetime::Transient => container.add_transient(|| ServiceB { number: 3 }).map(|_| ()),
        };

        prop_assert!(matches!(outcome, Err(DiError::DuplicateRegistration(_))));
        prop_assert_eq!(container.descriptors()[0].lifetime(), first);
    }
}
