//! Parsing of `#[inject(...)]` markers.
//!
//! A marker takes only labeled arguments, `label = value` or `label: value`,
//! in any order:
//!
//! - `key = <expr>`: provider key, passed through to `resolve` unchanged
//! - `container = <expr>`: container to resolve from
//! - `container = .member`: shorthand for `Container::member()`

use proc_macro2::Span;
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Ident, Meta, Result, Token};
use thiserror::Error;

/// Marker problems reported at expansion time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum MarkerError {
    #[error("No label found for argument with value: {value}.")]
    NoLabelFoundForArgument { value: String },

    #[error("Unsupported argument label: {0}")]
    UnsupportedArgumentLabel(String),

    #[error("Duplicate argument label: {0}")]
    DuplicateArgumentLabel(String),
}

impl MarkerError {
    fn at(self, span: Span) -> syn::Error {
        syn::Error::new(span, self.to_string())
    }
}

/// Labels accepted by the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgumentLabel {
    Key,
    Container,
}

impl ArgumentLabel {
    const ALL: [ArgumentLabel; 2] = [ArgumentLabel::Key, ArgumentLabel::Container];

    fn as_str(self) -> &'static str {
        match self {
            ArgumentLabel::Key => "key",
            ArgumentLabel::Container => "container",
        }
    }

    fn from_label(label: &str) -> std::result::Result<Self, MarkerError> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == label)
            .ok_or_else(|| MarkerError::UnsupportedArgumentLabel(label.to_string()))
    }
}

/// The container an accessor resolves from.
#[derive(Debug, Clone)]
pub(crate) enum ContainerTarget {
    /// `Container::shared()`, used when the marker names no container.
    Shared,
    /// `.member`, expanded to `Container::member()`.
    Member(Ident),
    /// Any other expression, used as written.
    Expr(Expr),
}

/// A successfully parsed marker.
#[derive(Debug, Clone)]
pub(crate) struct InjectMarker {
    pub key: Option<Expr>,
    pub container: ContainerTarget,
}

enum ArgumentValue {
    Member { dot: Token![.], member: Ident },
    Expr(Expr),
}

impl ArgumentValue {
    fn span(&self) -> Span {
        match self {
            ArgumentValue::Member { dot, member } => dot
                .span
                .join(member.span())
                .unwrap_or_else(|| member.span()),
            ArgumentValue::Expr(expr) => syn::spanned::Spanned::span(expr),
        }
    }

    fn text(&self) -> String {
        match self {
            ArgumentValue::Member { member, .. } => format!(".{member}"),
            ArgumentValue::Expr(expr) => expr.to_token_stream().to_string(),
        }
    }
}

impl Parse for ArgumentValue {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(Token![.]) {
            Ok(ArgumentValue::Member {
                dot: input.parse()?,
                member: input.call(Ident::parse_any)?,
            })
        } else {
            input.parse().map(ArgumentValue::Expr)
        }
    }
}

struct MarkerArgument {
    label: Option<Ident>,
    value: ArgumentValue,
}

/// `=` or a single `:` after the label; `==` and `::` belong to the value.
fn peek_label_separator(input: ParseStream) -> bool {
    let assign = input.peek2(Token![=]) && !input.peek2(Token![==]);
    let colon = input.peek2(Token![:]) && !input.peek2(Token![::]);
    assign || colon
}

impl Parse for MarkerArgument {
    fn parse(input: ParseStream) -> Result<Self> {
        let labeled = input.peek(Ident::peek_any) && peek_label_separator(input);

        let label = if labeled {
            let label = input.call(Ident::parse_any)?;
            if input.peek(Token![:]) {
                input.parse::<Token![:]>()?;
            } else {
                input.parse::<Token![=]>()?;
            }
            Some(label)
        } else {
            None
        };

        Ok(MarkerArgument {
            label,
            value: input.parse()?,
        })
    }
}

/// Check if an attribute is an `#[inject]` marker
pub(crate) fn is_inject_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("inject")
}

/// Parses one `#[inject]` attribute.
///
/// Fails on the first malformed argument; no partial marker is produced.
pub(crate) fn parse_marker(attr: &Attribute) -> Result<InjectMarker> {
    let arguments = match &attr.meta {
        Meta::Path(_) => Punctuated::new(),
        Meta::List(list) => {
            list.parse_args_with(Punctuated::<MarkerArgument, Token![,]>::parse_terminated)?
        }
        Meta::NameValue(name_value) => {
            return Err(syn::Error::new_spanned(
                name_value,
                "expected `#[inject]` or `#[inject(key = ..., container = ...)]`",
            ));
        }
    };

    let mut marker = InjectMarker {
        key: None,
        container: ContainerTarget::Shared,
    };
    let mut seen = Vec::with_capacity(ArgumentLabel::ALL.len());

    for argument in arguments {
        let Some(label) = argument.label else {
            let span = argument.value.span();
            let value = argument.value.text();
            return Err(MarkerError::NoLabelFoundForArgument { value }.at(span));
        };

        let name = label.unraw().to_string();
        let argument_label = match ArgumentLabel::from_label(&name) {
            Ok(argument_label) => argument_label,
            Err(err) => return Err(err.at(label.span())),
        };

        if seen.contains(&argument_label) {
            return Err(MarkerError::DuplicateArgumentLabel(name).at(label.span()));
        }
        seen.push(argument_label);

        match (argument_label, argument.value) {
            (ArgumentLabel::Key, ArgumentValue::Expr(expr)) => marker.key = Some(expr),
            (ArgumentLabel::Key, value @ ArgumentValue::Member { .. }) => {
                return Err(syn::Error::new(
                    value.span(),
                    "`key` expects a string expression",
                ));
            }
            (ArgumentLabel::Container, ArgumentValue::Member { member, .. }) => {
                marker.container = ContainerTarget::Member(member);
            }
            (ArgumentLabel::Container, ArgumentValue::Expr(expr)) => {
                marker.container = ContainerTarget::Expr(expr);
            }
        }
    }

    Ok(marker)
}
