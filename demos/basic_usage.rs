//! Basic usage example for inject-container.
//!
//! Demonstrates:
//! - Registering transient and container-scoped providers
//! - Resolving by type and by explicit key
//! - Factories that resolve their own dependencies
//! - `#[injectable]` accessors on the shared container
//! - Watching container events with a trace callback
//!
//! Run with: `cargo run --example basic_usage`

use inject_container::{injectable, Container, ContainerError, Scope};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct AppConfig {
    name: String,
    database_url: String,
}

trait Repository: Send + Sync {
    fn describe(&self) -> String;
}

struct PostgresRepository {
    url: String,
    connection_id: u32,
}

impl Repository for PostgresRepository {
    fn describe(&self) -> String {
        format!("connection #{} to {}", self.connection_id, self.url)
    }
}

#[injectable]
struct ReportService {
    #[inject]
    config: Arc<AppConfig>,
    #[inject(key = "reports")]
    repository: Arc<dyn Repository>,
    title: String,
}

impl ReportService {
    async fn render(&self) -> Result<String, ContainerError> {
        let config = self.config().await?;
        let repository = self.repository().await?;
        Ok(format!(
            "[{}] {} via {}",
            config.name,
            self.title,
            repository.describe()
        ))
    }
}

#[tokio::main]
async fn main() -> Result<(), ContainerError> {
    println!("=== inject-container: Basic Usage ===\n");

    let container = Container::shared();
    container.set_trace_callback(|event| println!("   [trace] {event}"));

    // -------------------------------------------------------------------------
    // 1. Register a container-scoped configuration
    // -------------------------------------------------------------------------
    println!("1. Registering AppConfig (container scope)...");

    container
        .register_fn(None, Scope::Container, || {
            Ok(Arc::new(AppConfig {
                name: "MyApp".to_string(),
                database_url: "postgres://localhost/app".to_string(),
            }))
        })
        .await?;

    // -------------------------------------------------------------------------
    // 2. Register a transient repository that depends on the configuration
    // -------------------------------------------------------------------------
    println!("\n2. Registering a transient repository (\"reports\")...");

    let connections = Arc::new(AtomicU32::new(0));
    container
        .register(Some("reports"), Scope::Transient, move |registry| {
            let connections = Arc::clone(&connections);
            Box::pin(async move {
                let config: Arc<AppConfig> = registry.resolve(None).await?;
                Ok(Arc::new(PostgresRepository {
                    url: config.database_url.clone(),
                    connection_id: connections.fetch_add(1, Ordering::SeqCst),
                }) as Arc<dyn Repository>)
            })
        })
        .await?;

    // -------------------------------------------------------------------------
    // 3. Resolve by type: the same config every time
    // -------------------------------------------------------------------------
    println!("\n3. Resolving AppConfig twice...");

    let a: Arc<AppConfig> = container.resolve(None).await?;
    let b: Arc<AppConfig> = container.resolve(None).await?;
    println!("   same instance: {}", Arc::ptr_eq(&a, &b));

    // -------------------------------------------------------------------------
    // 4. Resolve through an #[injectable] accessor
    // -------------------------------------------------------------------------
    println!("\n4. Rendering through ReportService accessors...");

    let service = ReportService {
        title: "Monthly revenue".to_string(),
    };
    println!("   {}", service.render().await?);
    println!("   {}", service.render().await?);

    // -------------------------------------------------------------------------
    // 5. Errors
    // -------------------------------------------------------------------------
    println!("\n5. Error cases...");

    container.clear_trace_callback();

    let duplicate = container
        .register_fn(None, Scope::Transient, || {
            Ok(Arc::new(AppConfig {
                name: "Other".to_string(),
                database_url: String::new(),
            }))
        })
        .await;
    if let Err(err) = duplicate {
        println!("   {err}");
    }
    if let Err(err) = container.resolve::<Arc<String>>(Some("missing")).await {
        println!("   {err}");
    }
    if let Err(err) = container.resolve::<String>(Some("reports")).await {
        println!("   {err}");
    }

    println!("\n=== Done ===");
    Ok(())
}
