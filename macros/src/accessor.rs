//! Accessor code generation for parsed `#[inject]` markers.
//!
//! The generated accessor has the shape
//!
//! ```ignore
//! async fn name(&self) -> Result<Ty, ContainerError> {
//!     <container>.resolve::<Ty>(<key>).await
//! }
//! ```
//!
//! and is the only place that knows how the runtime's `resolve` call is spelled.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Ident, Type, Visibility};

use crate::marker::{ContainerTarget, InjectMarker};

/// Everything taken from the annotated field.
pub(crate) struct AccessorTarget<'a> {
    pub attrs: Vec<&'a Attribute>,
    pub vis: &'a Visibility,
    pub name: &'a Ident,
    pub ty: &'a Type,
}

/// Expression naming the container to resolve from.
fn container_expr(target: &ContainerTarget, runtime: &TokenStream) -> TokenStream {
    match target {
        ContainerTarget::Shared => quote!(#runtime::Container::shared()),
        ContainerTarget::Member(member) => quote!(#runtime::Container::#member()),
        ContainerTarget::Expr(expr) => quote!((#expr)),
    }
}

/// The `key` argument of the generated `resolve` call.
fn key_arg(key: Option<&syn::Expr>) -> TokenStream {
    match key {
        Some(key) => quote! {
            ::core::option::Option::Some(::core::convert::AsRef::<str>::as_ref(&(#key)))
        },
        None => quote!(::core::option::Option::None),
    }
}

/// Generates the resolving accessor for one field.
pub(crate) fn generate_accessor(
    field: &AccessorTarget<'_>,
    marker: &InjectMarker,
    runtime: &TokenStream,
) -> TokenStream {
    let AccessorTarget {
        attrs,
        vis,
        name,
        ty,
    } = field;

    let container = container_expr(&marker.container, runtime);
    let key = key_arg(marker.key.as_ref());

    quote! {
        #(#attrs)*
        #vis async fn #name(&self) -> ::core::result::Result<#ty, #runtime::ContainerError> {
            #container.resolve::<#ty>(#key).await
        }
    }
}
