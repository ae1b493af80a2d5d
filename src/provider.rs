//! Providers: the registered recipes a container resolves values from.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::{Registry, Result};

/// A produced value with its concrete type erased.
pub(crate) type Erased = Box<dyn Any + Send + Sync>;

/// Lifetime policy for the values a provider produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// The factory runs on every resolution.
    #[default]
    Transient,
    /// The factory runs once per container; later resolutions share the cached value.
    Container,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Transient => f.write_str("transient"),
            Scope::Container => f.write_str("container"),
        }
    }
}

/// Type-erased factory stored in the provider table.
///
/// The registry handle is the container's locked state, so a factory may
/// resolve other keys through it without re-acquiring the lock.
pub(crate) trait ErasedFactory: Send + Sync {
    fn create<'a>(&'a self, registry: &'a mut Registry) -> BoxFuture<'a, Result<Erased>>;
}

/// Adapts an asynchronous `Fn(&mut Registry) -> BoxFuture<Result<T>>`.
pub(crate) struct AsyncFactory<T, F> {
    factory: F,
    _produces: PhantomData<fn() -> T>,
}

impl<T, F> AsyncFactory<T, F>
where
    F: for<'r> Fn(&'r mut Registry) -> BoxFuture<'r, Result<T>>,
{
    pub(crate) fn new(factory: F) -> Self {
        Self {
            factory,
            _produces: PhantomData,
        }
    }
}

impl<T, F> ErasedFactory for AsyncFactory<T, F>
where
    T: Send + Sync + 'static,
    F: for<'r> Fn(&'r mut Registry) -> BoxFuture<'r, Result<T>> + Send + Sync,
{
    fn create<'a>(&'a self, registry: &'a mut Registry) -> BoxFuture<'a, Result<Erased>> {
        let produced = (self.factory)(registry);
        Box::pin(async move {
            produced.await.map(|value| Box::new(value) as Erased)
        })
    }
}

/// Adapts a synchronous `Fn() -> Result<T>` for dependency-free providers.
pub(crate) struct SyncFactory<T, F> {
    factory: F,
    _produces: PhantomData<fn() -> T>,
}

impl<T, F> SyncFactory<T, F>
where
    F: Fn() -> Result<T>,
{
    pub(crate) fn new(factory: F) -> Self {
        Self {
            factory,
            _produces: PhantomData,
        }
    }
}

impl<T, F> ErasedFactory for SyncFactory<T, F>
where
    T: Send + Sync + 'static,
    F: Fn() -> Result<T> + Send + Sync,
{
    fn create<'a>(&'a self, _registry: &'a mut Registry) -> BoxFuture<'a, Result<Erased>> {
        let produced = (self.factory)().map(|value| Box::new(value) as Erased);
        Box::pin(futures::future::ready(produced))
    }
}

/// One registered recipe for producing a value.
///
/// Created only by registration and never modified afterwards.
#[derive(Clone)]
pub struct Provider {
    key: String,
    scope: Scope,
    type_name: String,
    pub(crate) factory: Arc<dyn ErasedFactory>,
}

impl Provider {
    pub(crate) fn new(
        key: String,
        scope: Scope,
        type_name: String,
        factory: Arc<dyn ErasedFactory>,
    ) -> Self {
        Self {
            key,
            scope,
            type_name,
            factory,
        }
    }

    /// Key the provider is registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Lifetime policy of the values this provider produces.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Name of the type this provider was registered to produce.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("key", &self.key)
            .field("scope", &self.scope)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scope_is_transient() {
        assert_eq!(Scope::default(), Scope::Transient);
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Transient.to_string(), "transient");
        assert_eq!(Scope::Container.to_string(), "container");
    }

    #[test]
    fn test_provider_debug_hides_factory() {
        let factory: Arc<dyn ErasedFactory> = Arc::new(SyncFactory::<u8, _>::new(|| Ok(1)));
        let provider = Provider::new("u8".into(), Scope::Container, "u8".into(), factory);

        let debug = format!("{provider:?}");
        assert!(debug.contains("key: \"u8\""));
        assert!(debug.contains("scope: Container"));
        assert!(debug.ends_with(".. }"));
    }

    #[test]
    fn test_provider_accessors() {
        let factory: Arc<dyn ErasedFactory> = Arc::new(SyncFactory::<u8, _>::new(|| Ok(1)));
        let provider = Provider::new("port".into(), Scope::Transient, "u8".into(), factory);

        assert_eq!(provider.key(), "port");
        assert_eq!(provider.scope(), Scope::Transient);
        assert_eq!(provider.type_name(), "u8");
    }
}
