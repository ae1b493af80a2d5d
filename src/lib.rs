//! # Inject Container
//!
//! An async dependency-injection container. Providers are registered under string
//! keys with a factory and a [`Scope`], and typed values are resolved from them on
//! demand. Every container serializes its registrations and resolutions, so a
//! container-scoped factory runs exactly once per key no matter how many tasks
//! race to resolve it first.
//!
//! ## Quick Start
//!
//! ```rust
//! use inject_container::{Container, Scope};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "Hello".into()
//!     }
//! }
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let container = Container::new();
//!
//! // Registered under the key "Greeter"
//! container
//!     .register_fn(None, Scope::Container, || Ok(Arc::new(English) as Arc<dyn Greeter>))
//!     .await?;
//!
//! let greeter: Arc<dyn Greeter> = container.resolve(None).await?;
//! assert_eq!(greeter.greet(), "Hello");
//! # Ok::<(), inject_container::ContainerError>(())
//! # }).unwrap();
//! ```
//!
//! ## Injected accessors
//!
//! [`injectable`] turns fields marked `#[inject]` into async accessors that
//! resolve the field's type from a container:
//!
//! ```rust
//! use inject_container::{injectable, Container, ContainerError, Scope};
//! use std::sync::Arc;
//!
//! #[injectable]
//! struct Report {
//!     #[inject(key = "title")]
//!     title: Arc<String>,
//! }
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! Container::shared()
//!     .register_fn(Some("title"), Scope::Container, || Ok(Arc::new("Q3".to_string())))
//!     .await?;
//!
//! let report = Report {};
//! assert_eq!(report.title().await?.as_str(), "Q3");
//! # Ok::<(), ContainerError>(())
//! # }).unwrap();
//! ```
//!
//! ## Main Types
//!
//! - [`Container`] - register providers and resolve values
//! - [`Registry`] - the locked tables a factory receives to resolve its own dependencies
//! - [`Scope`] - transient or container-scoped lifetimes
//! - [`ContainerError`] - everything registration and resolution can fail with
//! - [`ContainerEvent`] - events delivered to [`Container::set_trace_callback`]

extern crate self as inject_container;

mod container;
mod container_error;
mod container_event;
mod keys;
mod provider;

pub use container::{Container, Registry, TraceCallback};
pub use container_error::{ContainerError, FactoryError};
pub use container_event::{ContainerEvent, ResolveOutcome};
pub use keys::{short_type_name, type_key};
pub use provider::{Provider, Scope};

pub use futures::future::BoxFuture;
pub use inject_container_macros::injectable;

/// Result type returned by container operations and factories.
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
