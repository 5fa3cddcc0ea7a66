#![no_main]

use ferrule::{Container, DiError, Lifetime, Resolver, Scope};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct Leaf;
struct Middle {
    _leaf: Arc<Leaf>,
}
struct Top {
    _middle: Arc<Middle>,
    _leaf: Arc<Leaf>,
}

fn lifetime(byte: u8) -> Lifetime {
    match byte % 3 {
        0 => Lifetime::Singleton,
        1 => Lifetime::Scoped,
        _ => Lifetime::Transient,
    }
}

fn register(container: &Container, leaf: Lifetime, middle: Lifetime, top: Lifetime) {
    let _ = match leaf {
        Lifetime::Singleton => container.add_singleton(|| Leaf).map(|_| ()),
        Lifetime::Scoped => container.add_scoped(|| Leaf).map(|_| ()),
        Lifetime::Transient => container.add_transient(|| Leaf).map(|_| ()),
    };
    let build_middle = |leaf: Arc<Leaf>| Middle { _leaf: leaf };
    let _ = match middle {
        Lifetime::Singleton => container.add_singleton(build_middle).map(|_| ()),
        Lifetime::Scoped => container.add_scoped(build_middle).map(|_| ()),
        Lifetime::Transient => container.add_transient(build_middle).map(|_| ()),
    };
    let build_top = |middle: Arc<Middle>, leaf: Arc<Leaf>| Top { _middle: middle, _leaf: leaf };
    let _ = match top {
        Lifetime::Singleton => container.add_singleton(build_top).map(|_| ()),
        Lifetime::Scoped => container.add_scoped(build_top).map(|_| ()),
        Lifetime::Transient => container.add_transient(build_top).map(|_| ()),
    };
}

// Every failure must be one of the lifetime errors the graph can produce
fn check<T: ?Sized>(result: Result<Arc<T>, DiError>) {
    match result {
        Ok(_) | Err(DiError::WrongLifetime { .. }) | Err(DiError::ScopeClosed) => {}
        Err(other) => panic!("unexpected resolution error: {}", other),
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let container = Container::new();
    register(&container, lifetime(data[0]), lifetime(data[1]), lifetime(data[2]));

    let mut scopes: Vec<Scope> = Vec::new();
    for op in &data[3..] {
        match op % 6 {
            0 => check(container.get::<Top>()),
            1 => scopes.push(container.create_scope()),
            2 => {
                if let Some(scope) = scopes.last() {
                    check(scope.get::<Top>());
                    check(scope.get::<Middle>());
                }
            }
            3 => {
                if let Some(scope) = scopes.first() {
                    let _ = scope.close();
                }
            }
            4 => {
                let _ = container.teardown();
            }
            _ => {
                if !scopes.is_empty() {
                    scopes.remove(0);
                }
            }
        }
    }
});
