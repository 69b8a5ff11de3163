//! `#[derive(Bind)]` implementation.
//!
//! # Overview
//!
//! The derive emits one `impl ::rivet_core::Bind` containing:
//!
//! 1. `struct_shape()` returns a `static StructShape` listing every named field in
//!    declaration order with its tags and kind
//! 2. `field_mut()` is a `match` from field index to a `FieldSlot`
//! 3. `validate_input()`, only with `#[bind(validate)]`
//!
//! # Field kinds
//!
//! The kind is decided from the field's type as written:
//!
//! | Written type | Kind |
//! |--------------|------|
//! | `String`, `bool`, `i8`..`i64`, `isize`, `u8`..`u64`, `usize`, `f32`, `f64` | `Scalar` |
//! | any type with `#[bind(flatten)]` | `Embedded` |
//! | anything else | `Unsupported` (a path, query or header value for it fails at request time) |
//!
//! # Body decoding
//!
//! The body is decoded by serde before any tag is applied, so the struct must
//! carry a container `#[serde(default)]`. Without it a body that leaves out a
//! key fails to decode instead of leaving the field for the tags and
//! defaults. The derive rejects such structs.

use proc_macro2::{TokenStream, TokenTree};
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type};

const SCALAR_TYPES: &[&str] = &[
    "String", "bool", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
    "f32", "f64",
];

// ============================================================================
// Attribute structures
// ============================================================================

/// Struct-level `#[bind(...)]` options.
#[derive(Default)]
struct StructAttrs {
    validate: bool,
}

/// Per-field `#[bind(...)]` options.
#[derive(Default)]
struct FieldAttrs {
    path: Option<LitStr>,
    query: Option<LitStr>,
    header: Option<LitStr>,
    default: Option<LitStr>,
    flatten: bool,
}

impl FieldAttrs {
    fn source_count(&self) -> usize {
        [&self.path, &self.query, &self.header]
            .into_iter()
            .filter(|tag| tag.is_some())
            .count()
    }
}

// ============================================================================
// Entry point
// ============================================================================

pub fn derive_bind(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Bind cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new(
                    input.span(),
                    "Bind requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(syn::Error::new(
                input.span(),
                "Bind cannot be derived for enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new(
                input.span(),
                "Bind cannot be derived for unions",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    if !has_serde_default(&input.attrs) {
        return Err(syn::Error::new(
            name.span(),
            "Bind structs need `#[serde(default)]` so body keys left out keep their zero value; \
             add it next to `#[derive(Deserialize)]`",
        ));
    }
    let name_lit = LitStr::new(&name.unraw().to_string(), name.span());

    let mut shapes = Vec::with_capacity(fields.len());
    let mut slots = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
        let attrs = parse_field_attrs(&field.attrs)?;
        check_field_attrs(&attrs, field.span())?;

        let field_lit = LitStr::new(&ident.unraw().to_string(), ident.span());
        let ty = &field.ty;

        let (kind, slot) = if attrs.flatten {
            embedded_field(ident, ty)
        } else if is_scalar(ty) {
            (
                quote! { ::rivet_core::FieldKind::Scalar(<#ty as ::rivet_core::Scalar>::KIND) },
                quote! { ::rivet_core::FieldSlot::Scalar(&mut self.#ident) },
            )
        } else {
            let type_name = quote!(#ty).to_string().replace(' ', "");
            (
                quote! { ::rivet_core::FieldKind::Unsupported(#type_name) },
                quote! { ::rivet_core::FieldSlot::Unsupported(#type_name) },
            )
        };

        let path = opt_lit(attrs.path.as_ref());
        let query = opt_lit(attrs.query.as_ref());
        let header = opt_lit(attrs.header.as_ref());
        let default = opt_lit(attrs.default.as_ref());

        shapes.push(quote! {
            ::rivet_core::FieldShape {
                name: #field_lit,
                kind: #kind,
                tags: ::rivet_core::Tags {
                    path: #path,
                    query: #query,
                    header: #header,
                    default: #default,
                },
            }
        });
        slots.push(quote! { #index => #slot, });
    }

    let validate_impl = if struct_attrs.validate {
        quote! {
            fn validate_input(&self) -> ::rivet_core::BindResult<()> {
                ::rivet_core::validate_struct(self)
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl ::rivet_core::Bind for #name {
            fn struct_shape() -> &'static ::rivet_core::StructShape {
                static SHAPE: ::rivet_core::StructShape = ::rivet_core::StructShape {
                    name: #name_lit,
                    fields: &[#(#shapes),*],
                };
                &SHAPE
            }

            fn shape(&self) -> &'static ::rivet_core::StructShape {
                <Self as ::rivet_core::Bind>::struct_shape()
            }

            fn field_mut(&mut self, index: usize) -> ::rivet_core::FieldSlot<'_> {
                match index {
                    #(#slots)*
                    _ => ::rivet_core::FieldSlot::Unsupported(#name_lit),
                }
            }

            #validate_impl
        }
    })
}

// ============================================================================
// Attribute parsing
// ============================================================================

fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut result = StructAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("bind") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("validate") {
                result.validate = true;
                Ok(())
            } else {
                Err(meta.error("unknown struct attribute, expected `validate`"))
            }
        })?;
    }

    Ok(result)
}

/// Whether a container `#[serde(...)]` attribute carries `default`.
fn has_serde_default(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .filter_map(|attr| attr.meta.require_list().ok())
        .any(|list| {
            list.tokens
                .clone()
                .into_iter()
                .any(|tt| matches!(tt, TokenTree::Ident(ident) if ident == "default"))
        })
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("bind") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("path") {
                result.path = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("query") {
                result.query = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("header") {
                result.header = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("default") {
                result.default = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("flatten") {
                result.flatten = true;
            } else {
                return Err(meta.error(
                    "unknown field attribute, expected one of \
                     `path`, `query`, `header`, `default`, `flatten`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn check_field_attrs(attrs: &FieldAttrs, span: proc_macro2::Span) -> syn::Result<()> {
    if attrs.flatten && (attrs.source_count() > 0 || attrs.default.is_some()) {
        return Err(syn::Error::new(
            span,
            "#[bind(flatten)] cannot be combined with other bind attributes",
        ));
    }
    if attrs.source_count() > 1 {
        return Err(syn::Error::new(
            span,
            "a field can be bound from only one of `path`, `query` or `header`",
        ));
    }
    Ok(())
}

// ============================================================================
// Type inspection
// ============================================================================

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path.path.segments.last(),
        _ => None,
    }
}

fn is_scalar(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| {
        segment.arguments.is_none() && SCALAR_TYPES.iter().any(|s| segment.ident == s)
    })
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn embedded_field(ident: &syn::Ident, ty: &Type) -> (TokenStream, TokenStream) {
    match option_inner(ty) {
        Some(inner) => (
            quote! {
                ::rivet_core::FieldKind::Embedded {
                    shape: <#inner as ::rivet_core::Bind>::struct_shape,
                    lazy: true,
                }
            },
            quote! {
                ::rivet_core::FieldSlot::Embedded(::rivet_core::ensure_init::<#inner>(&mut self.#ident))
            },
        ),
        None => (
            quote! {
                ::rivet_core::FieldKind::Embedded {
                    shape: <#ty as ::rivet_core::Bind>::struct_shape,
                    lazy: false,
                }
            },
            quote! { ::rivet_core::FieldSlot::Embedded(&mut self.#ident) },
        ),
    }
}

fn opt_lit(lit: Option<&LitStr>) -> TokenStream {
    match lit {
        Some(lit) => quote! { ::core::option::Option::Some(#lit) },
        None => quote! { ::core::option::Option::None },
    }
}
