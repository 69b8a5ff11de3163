//! Procedural macros for the Rivet framework.
//!
//! This crate provides:
//!
//! - `#[derive(Bind)]` - Generates the static field shape and field accessors
//!   that let the binder populate a struct from path, query and header values
//!
//! # Bind Derive Macro
//!
//! ```rust,ignore
//! use rivet_macros::Bind;
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize, Bind)]
//! #[serde(default)]
//! pub struct GetUserRequest {
//!     #[bind(flatten)]
//!     #[serde(flatten)]
//!     pub user: UserId,
//!     #[bind(query = "name")]
//!     pub name: String,
//!     #[bind(query = "age", default = "21")]
//!     pub age: u32,
//! }
//! ```

mod bind;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `rivet_core::Bind` for a struct with named fields.
///
/// # Struct attributes
///
/// - `#[bind(validate)]` - Run `validator::Validate` rules after binding.
///   The struct must also derive `Validate`.
///
/// # Field attributes
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `#[bind(path = "id")]` | Bind from the path variable `id` |
/// | `#[bind(query = "age")]` | Bind from the query parameter `age` |
/// | `#[bind(header = "X-Request-Id")]` | Bind from the named header/value |
/// | `#[bind(default = "21")]` | Applied when the field is still zero after binding |
/// | `#[bind(flatten)]` | Embedded struct; its fields bind as if declared here |
///
/// A field may carry at most one of `path`, `query` and `header`. Flattened
/// fields may be `T`, `Box<T>`, `Option<T>` or `Option<Box<T>>` where `T:
/// Bind + Default`; `Option` fields are allocated on first use.
///
/// The struct must carry `#[serde(default)]`: the body is decoded first and a
/// key it leaves out has to keep the field's zero value. `serde` is also
/// accepted as a helper attribute here, so structs that are only ever
/// flattened can carry it without deriving `Deserialize`.
#[proc_macro_derive(Bind, attributes(bind, serde))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match bind::derive_bind(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
