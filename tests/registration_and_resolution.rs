//! Integration tests for registration, resolution and the error surface.
//!
//! Every test builds its own container, so nothing here touches the shared one.

use inject_container::{BoxFuture, Container, ContainerError, Registry, Result, Scope};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait TestService: Send + Sync {
    fn name(&self) -> &'static str;
}

struct TestServiceImpl;

impl TestService for TestServiceImpl {
    fn name(&self) -> &'static str {
        "TestServiceImpl"
    }
}

fn test_service(_: &mut Registry) -> BoxFuture<'_, Result<Arc<dyn TestService>>> {
    Box::pin(async {
        Ok(Arc::new(TestServiceImpl) as Arc<dyn TestService>)
    })
}

#[tokio::test]
async fn test_transient_service_end_to_end() {
    let container = Container::new();

    container
        .register(None, Scope::Transient, test_service)
        .await
        .unwrap();

    let first: Arc<dyn TestService> = container.resolve(None).await.unwrap();
    let second: Arc<dyn TestService> = container.resolve(None).await.unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.name(), "TestServiceImpl");
    assert_eq!(second.name(), "TestServiceImpl");

    let err = container
        .register(None, Scope::Transient, test_service)
        .await
        .err()
        .unwrap();
    assert_eq!(
        err,
        ContainerError::DuplicateRegistration {
            key: "TestService".into(),
        }
    );
}

#[tokio::test]
async fn test_container_scoped_service_returns_injected_instance() {
    let container = Container::new();
    let injected: Arc<dyn TestService> = Arc::new(TestServiceImpl);
    let provided = Arc::clone(&injected);

    container
        .register_fn(None, Scope::Container, move || Ok(Arc::clone(&provided)))
        .await
        .unwrap();

    let resolved: Arc<dyn TestService> = container.resolve(None).await.unwrap();
    assert!(Arc::ptr_eq(&resolved, &injected));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected_for_any_scope() {
    let container = Container::new();

    container
        .register_fn(Some("k"), Scope::Container, || Ok(1u8))
        .await
        .unwrap();

    for scope in [Scope::Transient, Scope::Container] {
        let err = container
            .register_fn(Some("k"), scope, || Ok(2u8))
            .await
            .err()
            .unwrap();
        assert_eq!(
            err,
            ContainerError::DuplicateRegistration { key: "k".into() }
        );
    }

    let value: u8 = container.resolve(Some("k")).await.unwrap();
    assert_eq!(value, 1);
}

#[tokio::test]
async fn test_provider_not_found_never_invokes_a_factory() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let container = Container::new();
    container
        .register_fn(Some("other"), Scope::Transient, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(0u32)
        })
        .await
        .unwrap();

    let err = container
        .resolve::<Arc<dyn TestService>>(None)
        .await
        .err()
        .unwrap();
    assert_eq!(
        err,
        ContainerError::ProviderNotFound {
            key: "TestService".into(),
        }
    );

    let err = container.resolve::<u32>(Some("missing")).await.unwrap_err();
    assert_eq!(err.key(), Some("missing"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_type_mismatch_names_both_types() {
    let container = Container::new();
    let registration_key = "custom-key";

    container
        .register(Some(registration_key), Scope::Transient, test_service)
        .await
        .unwrap();

    let err = container
        .resolve::<String>(Some(registration_key))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ContainerError::TypeMismatch {
            key: registration_key.into(),
            expected: "String".into(),
            actual: "Arc<dyn TestService>".into(),
        }
    );
}

#[tokio::test]
async fn test_factory_errors_propagate_unchanged() {
    #[derive(Debug, thiserror::Error)]
    #[error("database offline")]
    struct Offline;

    let container = Container::new();
    container
        .register_fn(Some("db"), Scope::Container, || -> Result<Arc<String>> {
            Err(ContainerError::factory(Offline))
        })
        .await
        .unwrap();

    let err = container
        .resolve::<Arc<String>>(Some("db"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "database offline");

    let ContainerError::Factory(source) = err else {
        panic!("expected a factory error");
    };
    assert!(source.downcast_ref::<Offline>().is_some());

    // a failed container-scoped factory caches nothing
    assert!(!container.is_cached("db").await);
}

#[tokio::test]
async fn test_failed_factory_is_retried_on_next_resolution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let container = Container::new();
    container
        .register_fn(Some("flaky"), Scope::Container, move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ContainerError::factory("first call fails"))
            } else {
                Ok(Arc::new(7u64))
            }
        })
        .await
        .unwrap();

    assert!(container.resolve::<Arc<u64>>(Some("flaky")).await.is_err());

    let first: Arc<u64> = container.resolve(Some("flaky")).await.unwrap();
    let second: Arc<u64> = container.resolve(Some("flaky")).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_dependencies_resolve_through_the_registry() {
    struct Config {
        url: String,
    }

    struct Database {
        config: Arc<Config>,
    }

    let container = Container::new();
    container
        .register_fn(None, Scope::Container, || {
            Ok(Arc::new(Config {
                url: "postgres://localhost/app".into(),
            }))
        })
        .await
        .unwrap()
        .register(None, Scope::Transient, |registry| {
            Box::pin(async move {
                let config: Arc<Config> = registry.resolve(None).await?;
                Ok(Arc::new(Database { config }))
            })
        })
        .await
        .unwrap();

    let a: Arc<Database> = container.resolve(None).await.unwrap();
    let b: Arc<Database> = container.resolve(None).await.unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a.config, &b.config));
    assert_eq!(a.config.url, "postgres://localhost/app");
}

#[tokio::test]
async fn test_cached_mismatch_is_kept_under_its_key() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let container = Container::new();
    container
        .register_fn(Some("limit"), Scope::Container, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(100usize)
        })
        .await
        .unwrap();

    let err = container.resolve::<i64>(Some("limit")).await.unwrap_err();
    assert!(matches!(err, ContainerError::TypeMismatch { .. }));

    let limit: usize = container.resolve(Some("limit")).await.unwrap();
    assert_eq!(limit, 100);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
