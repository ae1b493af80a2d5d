//! The dependency-injection container.
//!
//! A [`Container`] maps string keys to [`Provider`]s and resolves typed values
//! from them on demand. Every registration and resolution on one container runs
//! with exclusive access to its tables, so a container-scoped factory runs at
//! most once per key even when many tasks resolve it for the first time
//! concurrently.
//!
//! # Examples
//!
//! ```
//! use inject_container::{Container, Scope};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let container = Container::new();
//!
//! container
//!     .register_fn(None, Scope::Container, || Ok("postgres://localhost".to_string()))
//!     .await?;
//!
//! let url: String = container.resolve(None).await?;
//! assert_eq!(url, "postgres://localhost");
//! # Ok::<(), inject_container::ContainerError>(())
//! # }).unwrap();
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex as StdMutex};

use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::provider::{AsyncFactory, Erased, ErasedFactory, SyncFactory};
use crate::{
    short_type_name, type_key, ContainerError, ContainerEvent, Provider, ResolveOutcome, Result,
    Scope,
};

/// The process-wide shared container, created on first use.
static SHARED: LazyLock<Container> = LazyLock::new(Container::new);

// -------------------------------------------------------------------------------------------------
// Tracing callback support
// -------------------------------------------------------------------------------------------------

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`ContainerEvent`] emitted by the container it
/// was installed on, including events from nested resolutions made by factories.
pub type TraceCallback = dyn Fn(&ContainerEvent) + Send + Sync + 'static;

#[derive(Default)]
struct TraceSlot(StdMutex<Option<Arc<TraceCallback>>>);

impl TraceSlot {
    fn set(&self, callback: Option<Arc<TraceCallback>>) {
        *self.0.lock().unwrap_or_else(|p| p.into_inner()) = callback;
    }

    fn emit(&self, event: ContainerEvent) {
        // cloned out so a callback may touch the slot without deadlocking
        let callback = self.0.lock().unwrap_or_else(|p| p.into_inner()).clone();
        if let Some(callback) = callback {
            callback(&event);
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Registry
// -------------------------------------------------------------------------------------------------

/// The provider and instance tables of one container.
///
/// A `Registry` is only reachable while its container's lock is held: through
/// [`Container`] operations, or as the argument handed to a factory. Factories
/// use it to resolve their own dependencies without re-acquiring the lock.
pub struct Registry {
    providers: HashMap<String, Provider>,
    instances: HashMap<String, Erased>,
    trace: Arc<TraceSlot>,
}

impl Registry {
    fn new(trace: Arc<TraceSlot>) -> Self {
        Self {
            providers: HashMap::new(),
            instances: HashMap::new(),
            trace,
        }
    }

    /// Registers an asynchronous factory under `key`, or under [`type_key::<T>()`]
    /// when `key` is `None`.
    ///
    /// No value is produced until the first resolution.
    ///
    /// # Errors
    ///
    /// [`ContainerError::DuplicateRegistration`] if the key is taken. The existing
    /// provider is kept.
    pub fn register<T, F>(
        &mut self,
        key: Option<&str>,
        scope: Scope,
        factory: F,
    ) -> Result<&mut Self>
    where
        T: Send + Sync + 'static,
        F: for<'r> Fn(&'r mut Registry) -> BoxFuture<'r, Result<T>> + Send + Sync + 'static,
    {
        self.insert::<T>(key, scope, Arc::new(AsyncFactory::new(factory)))
    }

    /// Registers a synchronous factory that needs nothing from the container.
    ///
    /// # Errors
    ///
    /// [`ContainerError::DuplicateRegistration`] if the key is taken.
    pub fn register_fn<T, F>(
        &mut self,
        key: Option<&str>,
        scope: Scope,
        factory: F,
    ) -> Result<&mut Self>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        self.insert::<T>(key, scope, Arc::new(SyncFactory::new(factory)))
    }

    fn insert<T: 'static>(
        &mut self,
        key: Option<&str>,
        scope: Scope,
        factory: Arc<dyn ErasedFactory>,
    ) -> Result<&mut Self> {
        let key = key.map_or_else(type_key::<T>, str::to_owned);

        if self.providers.contains_key(&key) {
            warn!(key = %key, "rejected duplicate registration");
            return Err(ContainerError::DuplicateRegistration { key });
        }

        debug!(key = %key, scope = %scope, "registered provider");
        self.trace.emit(ContainerEvent::Register {
            key: key.clone(),
            scope,
        });

        let provider = Provider::new(key.clone(), scope, short_type_name::<T>(), factory);
        self.providers.insert(key, provider);

        Ok(self)
    }

    /// Resolves a value of type `T` from the provider under `key`, or under
    /// [`type_key::<T>()`] when `key` is `None`.
    ///
    /// Transient providers run their factory on every call. Container-scoped
    /// providers run it on the first call and hand out clones of the cached value
    /// afterwards; wrap shared services in an `Arc` to share one instance.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::ProviderNotFound`] if no provider has the key; no factory runs
    /// - [`ContainerError::TypeMismatch`] if the produced value is not a `T`.
    ///   A mismatched container-scoped value stays cached under its key.
    /// - whatever the factory itself returned, unchanged
    pub async fn resolve<T>(&mut self, key: Option<&str>) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let key = key.map_or_else(type_key::<T>, str::to_owned);

        let Some(provider) = self.providers.get(&key) else {
            debug!(key = %key, "no provider registered");
            self.emit_resolve(&key, ResolveOutcome::NotFound);
            return Err(ContainerError::ProviderNotFound { key });
        };

        let scope = provider.scope();
        let actual = provider.type_name().to_string();
        let factory = Arc::clone(&provider.factory);

        match scope {
            Scope::Transient => {
                let value = self.create(&key, factory.as_ref()).await?;

                match value.downcast::<T>() {
                    Ok(value) => {
                        self.emit_resolve(&key, ResolveOutcome::Created);
                        Ok(*value)
                    }
                    Err(_) => Err(self.mismatch::<T>(key, actual)),
                }
            }
            Scope::Container => {
                let outcome = if self.instances.contains_key(&key) {
                    trace!(key = %key, "returning cached instance");
                    ResolveOutcome::Cached
                } else {
                    let value = self.create(&key, factory.as_ref()).await?;
                    self.instances.insert(key.clone(), value);
                    ResolveOutcome::Created
                };

                let cached = self
                    .instances
                    .get(&key)
                    .and_then(|value| downcast_cloned::<T>(&**value));

                match cached {
                    Some(value) => {
                        self.emit_resolve(&key, outcome);
                        Ok(value)
                    }
                    None => Err(self.mismatch::<T>(key, actual)),
                }
            }
        }
    }

    async fn create(&mut self, key: &str, factory: &dyn ErasedFactory) -> Result<Erased> {
        debug!(key = %key, "invoking factory");

        match factory.create(self).await {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!(key = %key, error = %err, "factory failed");
                self.emit_resolve(key, ResolveOutcome::Failed);
                Err(err)
            }
        }
    }

    fn mismatch<T>(&self, key: String, actual: String) -> ContainerError {
        let expected = short_type_name::<T>();
        warn!(
            key = %key,
            expected = %expected,
            actual = %actual,
            "resolved value has unexpected type"
        );
        self.emit_resolve(&key, ResolveOutcome::Mismatch);

        ContainerError::TypeMismatch {
            key,
            expected,
            actual,
        }
    }

    fn emit_resolve(&self, key: &str, outcome: ResolveOutcome) {
        self.trace.emit(ContainerEvent::Resolve {
            key: key.to_string(),
            outcome,
        });
    }

    /// Checks whether a provider is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.providers.contains_key(key)
    }

    /// Checks whether a container-scoped value has already been produced for `key`.
    pub fn is_cached(&self, key: &str) -> bool {
        self.instances.contains_key(key)
    }

    /// Returns the provider registered under `key`.
    pub fn provider(&self, key: &str) -> Option<&Provider> {
        self.providers.get(key)
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn downcast_cloned<T: Clone + 'static>(value: &(dyn Any + Send + Sync)) -> Option<T> {
    value.downcast_ref::<T>().cloned()
}

// -------------------------------------------------------------------------------------------------
// Container
// -------------------------------------------------------------------------------------------------

/// An isolated registry of providers with its own monitor.
///
/// Containers share no state with each other. [`Container::shared`] returns the
/// process-wide instance used by `#[inject]` accessors that do not name a
/// container.
pub struct Container {
    registry: Mutex<Registry>,
    trace: Arc<TraceSlot>,
}

impl Container {
    /// Creates an empty, independent container.
    pub fn new() -> Self {
        let trace = Arc::new(TraceSlot::default());

        Self {
            registry: Mutex::new(Registry::new(Arc::clone(&trace))),
            trace,
        }
    }

    /// The process-wide shared container.
    ///
    /// Created on first access and never torn down.
    pub fn shared() -> &'static Container {
        &SHARED
    }

    /// Registers an asynchronous factory.
    ///
    /// The factory receives the container's [`Registry`] and may resolve other
    /// keys through it. Returns `self` so registrations can be chained.
    ///
    /// A factory must not call [`Container::resolve`] on the container that is
    /// running it: that container's lock is already held, and the call would never
    /// complete. Resolve through the `Registry` argument instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use inject_container::{Container, Scope};
    /// use std::sync::Arc;
    ///
    /// struct Config { url: String }
    /// struct Database { url: String }
    ///
    /// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    /// # rt.block_on(async {
    /// let container = Container::new();
    ///
    /// container
    ///     .register_fn(None, Scope::Container, || {
    ///         Ok(Arc::new(Config {
    ///             url: "sqlite::memory:".into(),
    ///         }))
    ///     })
    ///     .await?
    ///     .register(None, Scope::Transient, |registry| {
    ///         Box::pin(async move {
    ///             let config: Arc<Config> = registry.resolve(None).await?;
    ///             Ok(Arc::new(Database { url: config.url.clone() }))
    ///         })
    ///     })
    ///     .await?;
    ///
    /// let db: Arc<Database> = container.resolve(None).await?;
    /// assert_eq!(db.url, "sqlite::memory:");
    /// # Ok::<(), inject_container::ContainerError>(())
    /// # }).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// [`ContainerError::DuplicateRegistration`] if the key is taken.
    pub async fn register<T, F>(
        &self,
        key: Option<&str>,
        scope: Scope,
        factory: F,
    ) -> Result<&Self>
    where
        T: Send + Sync + 'static,
        F: for<'r> Fn(&'r mut Registry) -> BoxFuture<'r, Result<T>> + Send + Sync + 'static,
    {
        self.registry.lock().await.register(key, scope, factory)?;
        Ok(self)
    }

    /// Registers a synchronous factory that needs nothing from the container.
    ///
    /// # Errors
    ///
    /// [`ContainerError::DuplicateRegistration`] if the key is taken.
    pub async fn register_fn<T, F>(
        &self,
        key: Option<&str>,
        scope: Scope,
        factory: F,
    ) -> Result<&Self>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        self.registry.lock().await.register_fn(key, scope, factory)?;
        Ok(self)
    }

    /// Resolves a value of type `T`. See [`Registry::resolve`].
    ///
    /// Waits for exclusive access to the container; concurrent calls are served
    /// one at a time in the order they acquire it.
    ///
    /// # Errors
    ///
    /// [`ContainerError::ProviderNotFound`], [`ContainerError::TypeMismatch`], or
    /// the factory's own error.
    pub async fn resolve<T>(&self, key: Option<&str>) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.registry.lock().await.resolve(key).await
    }

    /// Checks whether a provider is registered under `key`.
    pub async fn contains(&self, key: &str) -> bool {
        self.registry.lock().await.contains(key)
    }

    /// Checks whether a container-scoped value has been produced for `key`.
    pub async fn is_cached(&self, key: &str) -> bool {
        self.registry.lock().await.is_cached(key)
    }

    /// Number of registered providers.
    pub async fn len(&self) -> usize {
        self.registry.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.registry.lock().await.is_empty()
    }

    /// Sets a tracing callback invoked for every operation on this container.
    ///
    /// # Example
    /// ```rust
    /// use inject_container::Container;
    ///
    /// let container = Container::new();
    /// container.set_trace_callback(|event| println!("[container-trace] {event}"));
    /// ```
    pub fn set_trace_callback(&self, callback: impl Fn(&ContainerEvent) + Send + Sync + 'static) {
        self.trace.set(Some(Arc::new(callback)));
    }

    /// Clears the tracing callback.
    pub fn clear_trace_callback(&self) {
        self.trace.set(None);
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
