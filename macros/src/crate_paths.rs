//! Resolves the path of the runtime crate using proc_macro_crate.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::Ident;

const RUNTIME_PACKAGE: &str = "inject-container";

/// Returns the path generated code uses to reach `inject-container`.
///
/// # Strategy
///
/// 1. The runtime crate itself (its unit tests, integration tests and doctests):
///    `::inject_container`, which the crate aliases to itself
/// 2. A dependency, possibly renamed in the caller's manifest: `::<name>`
/// 3. Fallback: `::inject_container`
pub(crate) fn runtime_crate() -> TokenStream {
    use proc_macro_crate::{crate_name, FoundCrate};

    match crate_name(RUNTIME_PACKAGE) {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) | Err(_) => quote!(::inject_container),
    }
}
