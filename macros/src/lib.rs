//! Procedural macros for inject-container
//!
//! This crate provides the `#[injectable]` attribute, which turns struct fields
//! marked with `#[inject]` into async accessors that resolve their value from a
//! container at the time they are called.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod accessor;
mod crate_paths;
mod injectable;
mod marker;

/// Replace `#[inject]` fields with accessors that resolve them from a container
///
/// # Example
///
/// ```ignore
/// use inject_container::injectable;
/// use std::sync::Arc;
///
/// #[injectable]
/// struct MyService {
///     // Container::shared(), key "MyRepository"
///     #[inject]
///     repository: Arc<dyn MyRepository>,
///
///     // Container::shared(), explicit key
///     #[inject(key = "InMemoryMyRepository")]
///     fallback: Arc<dyn MyRepository>,
///
///     // Container::custom(), resolved through a user-provided extension trait
///     #[inject(container = .custom)]
///     audit: Arc<dyn AuditLog>,
///
///     // any expression that evaluates to a container
///     #[inject(container = DOMAIN_CONTAINER, key = "clock")]
///     clock: Arc<dyn Clock>,
/// }
///
/// // expands the `repository` field to
/// impl MyService {
///     async fn repository(&self) -> Result<Arc<dyn MyRepository>, ContainerError> {
///         Container::shared().resolve::<Arc<dyn MyRepository>>(None).await
///     }
/// }
/// ```
///
/// # Marker arguments
///
/// - `key = <expr>` - provider key; anything that is `AsRef<str>`
/// - `container = <expr>` - the container to resolve from
/// - `container = .member` - shorthand for `Container::member()`
///
/// `label: value` is accepted wherever `label = value` is. Arguments must be
/// labeled and may appear in any order. An unlabeled argument
/// or an unknown label is a compile error reported on that argument, and the
/// field keeps its storage without an accessor.
#[proc_macro_attribute]
pub fn injectable(args: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let runtime = crate_paths::runtime_crate();

    injectable::injectable_impl(args.into(), input, &runtime)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
