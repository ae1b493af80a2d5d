//! Implementation of the `#[injectable]` macro

use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Field, Fields, Result};

use crate::accessor::{generate_accessor, AccessorTarget};
use crate::marker::{is_inject_attr, parse_marker};

/// What happened to one field.
enum FieldExpansion {
    /// No marker; the field stays as declared.
    Stored,
    /// The field became a resolving accessor.
    Accessor(TokenStream),
    /// The marker was malformed; the field stays stored and no accessor is emitted.
    Rejected(syn::Error),
}

fn is_doc_attr(attr: &&Attribute) -> bool {
    attr.path().is_ident("doc")
}

fn expand_field(field: &Field, runtime: &TokenStream) -> FieldExpansion {
    let markers: Vec<&Attribute> = field.attrs.iter().filter(|a| is_inject_attr(a)).collect();

    let attr = match markers.as_slice() {
        [] => return FieldExpansion::Stored,
        [attr] => *attr,
        [_, duplicate, ..] => {
            return FieldExpansion::Rejected(syn::Error::new_spanned(
                duplicate,
                "a field takes at most one #[inject] marker",
            ));
        }
    };

    let marker = match parse_marker(attr) {
        Ok(marker) => marker,
        Err(err) => return FieldExpansion::Rejected(err),
    };

    // named fields always carry an ident
    let Some(name) = field.ident.as_ref() else {
        return FieldExpansion::Stored;
    };

    let target = AccessorTarget {
        attrs: field.attrs.iter().filter(is_doc_attr).collect(),
        vis: &field.vis,
        name,
        ty: &field.ty,
    };

    FieldExpansion::Accessor(generate_accessor(&target, &marker, runtime))
}

/// Implementation of the `#[injectable]` attribute macro
///
/// This macro:
/// 1. Removes every `#[inject]` field from the struct
/// 2. Generates an inherent `async fn` accessor for each of them that resolves the
///    field's type from a container
///
/// A malformed marker is reported against its own span and leaves its field as a
/// plain stored field; the remaining fields are still expanded.
pub(crate) fn injectable_impl(
    args: TokenStream,
    mut input: DeriveInput,
    runtime: &TokenStream,
) -> Result<TokenStream> {
    if !args.is_empty() {
        return Err(syn::Error::new_spanned(
            args,
            "#[injectable] does not take arguments; configure fields with #[inject(...)]",
        ));
    }

    let struct_name = input.ident.clone();

    let fields = match &mut input.data {
        Data::Struct(data_struct) => match &mut data_struct.fields {
            Fields::Named(fields) => fields,
            Fields::Unit => return Ok(quote!(#input)),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "#[injectable] cannot be applied to tuple structs",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "#[injectable] can only be applied to structs",
            ));
        }
    };

    let mut accessors = Vec::new();
    let mut errors: Option<syn::Error> = None;
    let mut stored = Punctuated::new();

    for mut field in std::mem::take(&mut fields.named) {
        match expand_field(&field, runtime) {
            FieldExpansion::Stored => stored.push(field),
            FieldExpansion::Accessor(accessor) => accessors.push(accessor),
            FieldExpansion::Rejected(err) => {
                match errors.as_mut() {
                    Some(existing) => existing.combine(err),
                    None => errors = Some(err),
                }
                field.attrs.retain(|attr| !is_inject_attr(attr));
                stored.push(field);
            }
        }
    }
    fields.named = stored;

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let accessor_impl = if accessors.is_empty() {
        quote!()
    } else {
        quote! {
            impl #impl_generics #struct_name #ty_generics #where_clause {
                #(#accessors)*
            }
        }
    };
    let diagnostics = errors.map(|err| err.to_compile_error());

    Ok(quote! {
        #input

        #accessor_impl

        #diagnostics
    })
}
