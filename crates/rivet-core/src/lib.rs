//! # Rivet Core
//!
//! The binding engine behind Rivet handlers. Given a request source and an
//! input struct implementing [`Bind`], it fills the struct from four places
//! in a fixed order:
//!
//! ```text
//! body (serde_json) → path → query → header → defaults → validation
//! ```
//!
//! The pieces, leaves first:
//!
//! - [`scalar`]: the type coercer: string → scalar at the field's bit width
//! - [`shape`]: static per-type field descriptors (tags, kinds, embedding)
//! - [`walker`]: the [`Bind`] trait and the recursive, flattening field walk
//! - [`binder`]: the per-request pipeline over a [`RequestSource`]
//! - [`validation`]: `validator` integration and the missing/invalid split
//!
//! Input types normally get their [`Bind`] implementation from
//! `#[derive(Bind)]` in `rivet-macros`.

// Lets `#[derive(Bind)]` output (which names `::rivet_core`) compile inside this crate's tests.
extern crate self as rivet_core;

pub mod binder;
pub mod error;
pub mod scalar;
pub mod shape;
pub mod source;
pub mod validation;
pub mod walker;

pub use binder::{apply_defaults, bind_headers, bind_input, bind_path, bind_query, decode_body};
pub use error::{BindError, BindResult, CoerceError};
pub use scalar::{Scalar, ScalarKind, ScalarSlot, ScalarValue, coerce};
pub use shape::{FieldKind, FieldShape, ShapeLint, StructShape, Tag, Tags};
pub use source::RequestSource;
pub use validation::validate_struct;
pub use walker::{Bind, FieldSlot, ensure_init, walk};
