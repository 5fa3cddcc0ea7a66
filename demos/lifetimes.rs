//! Walks through the three lifetimes with a small request-handling setup.
//!
//! Run with `RUST_LOG=ferrule=debug cargo run --example lifetimes` to see the
//! container's own logging.

use ferrule::{Container, ContainerOptions, DiError, Dispose, DisposeError, LoggingObserver, Resolver};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ===== Services =====

struct AppConfig {
    database_url: String,
}

struct ConnectionPool {
    url: String,
}

impl Dispose for ConnectionPool {
    fn dispose(&self) -> Result<(), DisposeError> {
        println!("  closing pool for {}", self.url);
        Ok(())
    }
}

struct RequestContext {
    request_id: u64,
}

impl Dispose for RequestContext {
    fn dispose(&self) -> Result<(), DisposeError> {
        println!("  finished request {}", self.request_id);
        Ok(())
    }
}

trait Handler: Send + Sync {
    fn handle(&self, path: &str) -> String;
}

struct UserHandler {
    pool: Arc<ConnectionPool>,
    request: Arc<RequestContext>,
}

impl Handler for UserHandler {
    fn handle(&self, path: &str) -> String {
        format!("[req {}] {} via {}", self.request.request_id, path, self.pool.url)
    }
}

fn build_container() -> Result<Container, DiError> {
    let container = Container::with_options(ContainerOptions::from_env());
    container.add_observer(Arc::new(LoggingObserver::new()));

    container.add_instance(AppConfig {
        database_url: "postgres://localhost/app".to_string(),
    })?;
    container
        .add_singleton(|config: Arc<AppConfig>| ConnectionPool {
            url: config.database_url.clone(),
        })?
        .disposable();

    let next_request = Arc::new(AtomicU64::new(1));
    container
        .add_scoped_factory(move |_| {
            Ok(RequestContext {
                request_id: next_request.fetch_add(1, Ordering::Relaxed),
            })
        })?
        .disposable();

    container.add_transient_trait::<dyn Handler, _, _>(
        |pool: Arc<ConnectionPool>, request: Arc<RequestContext>| -> Arc<dyn Handler> {
            Arc::new(UserHandler { pool, request })
        },
    )?;

    Ok(container)
}

fn main() -> Result<(), DiError> {
    tracing_subscriber::registry()
        .with(fmt::layer().compact())
        .with(EnvFilter::from_default_env())
        .init();

    let container = build_container()?;

    for path in ["/users", "/users/1"] {
        println!("request {}", path);
        container.using_scope(|scope| {
            let first = scope.get::<dyn Handler>()?;
            let second = scope.get::<dyn Handler>()?;
            println!("  {}", first.handle(path));
            println!("  {}", second.handle(path));
            Ok::<_, DiError>(())
        })?;
    }

    match container.get::<RequestContext>() {
        Err(e) => println!("outside a scope: {}", e),
        Ok(_) => unreachable!("scoped services need a scope"),
    }

    println!("shutting down");
    container.teardown()
}
