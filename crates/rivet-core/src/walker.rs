//! The [`Bind`] trait and the recursive field walk.
//!
//! [`walk`] visits every field carrying a given [`Tag`], in declaration
//! order, descending depth-first into embedded fields as if their fields
//! were declared on the parent. Embedded `Option<_>` fields are allocated
//! with `Default::default()` before descending, so after any walk they are
//! `Some` even when nothing was bound into them.

use crate::error::BindResult;
use crate::scalar::ScalarSlot;
use crate::shape::{StructShape, Tag};

/// Mutable access to one field of a bindable value.
pub enum FieldSlot<'a> {
    /// A coercible scalar field.
    Scalar(&'a mut dyn ScalarSlot),
    /// An embedded struct, already initialized.
    Embedded(&'a mut dyn Bind),
    /// A field whose type cannot be bound; carries the type name.
    Unsupported(&'static str),
}

/// A struct that can be populated field by field from request sources.
///
/// Usually derived:
///
/// ```rust,ignore
/// use rivet_macros::Bind;
///
/// #[derive(Default, Deserialize, Bind)]
/// #[serde(default)]
/// struct GetUserRequest {
///     #[bind(flatten)]
///     #[serde(flatten)]
///     user: UserId,
///     #[bind(query = "age", default = "21")]
///     age: u32,
/// }
/// ```
///
/// The body is decoded before tags apply, so the derive insists on a
/// container `#[serde(default)]`. Without it a body leaving out `age` would
/// be rejected instead of falling back to the default:
///
/// ```compile_fail
/// use rivet_macros::Bind;
/// use serde::Deserialize;
///
/// #[derive(Default, Deserialize, Bind)]
/// struct PostUserRequest {
///     name: String,
///     #[bind(default = "21")]
///     age: u32,
/// }
/// ```
///
/// ```
/// use rivet_core::Bind;
/// use rivet_macros::Bind;
/// use serde::Deserialize;
///
/// #[derive(Default, Deserialize, Bind)]
/// #[serde(default)]
/// struct PostUserRequest {
///     name: String,
///     #[bind(default = "21")]
///     age: u32,
/// }
///
/// assert_eq!(PostUserRequest::struct_shape().fields.len(), 2);
/// ```
pub trait Bind {
    /// The static shape of this type.
    fn struct_shape() -> &'static StructShape
    where
        Self: Sized;

    /// The static shape of this value's type.
    fn shape(&self) -> &'static StructShape;

    /// Mutable access to the field at `index` in [`StructShape::fields`].
    ///
    /// Embedded `Option<_>` fields are initialized by this call.
    fn field_mut(&mut self, index: usize) -> FieldSlot<'_>;

    /// Runs declarative validation rules, if the type declares any.
    fn validate_input(&self) -> BindResult<()> {
        Ok(())
    }
}

impl<T: Bind> Bind for Box<T> {
    fn struct_shape() -> &'static StructShape {
        T::struct_shape()
    }

    fn shape(&self) -> &'static StructShape {
        (**self).shape()
    }

    fn field_mut(&mut self, index: usize) -> FieldSlot<'_> {
        (**self).field_mut(index)
    }

    fn validate_input(&self) -> BindResult<()> {
        (**self).validate_input()
    }
}

/// Allocates an embedded optional field on first access.
pub fn ensure_init<T: Default>(slot: &mut Option<T>) -> &mut T {
    slot.get_or_insert_with(T::default)
}

/// Visits every field of `target` tagged with `tag`.
///
/// `visit` receives the tag value (the external parameter name, or the
/// default literal) and the field. Untagged fields are skipped; the first
/// error stops the walk.
pub fn walk<F>(target: &mut dyn Bind, tag: Tag, visit: &mut F) -> BindResult<()>
where
    F: FnMut(&'static str, FieldSlot<'_>) -> BindResult<()>,
{
    let shape = target.shape();
    for (index, field) in shape.fields.iter().enumerate() {
        if field.is_embedded() {
            if let FieldSlot::Embedded(inner) = target.field_mut(index) {
                walk(inner, tag, visit)?;
            }
            continue;
        }

        let Some(tag_value) = field.tags.get(tag) else {
            continue;
        };
        visit(tag_value, target.field_mut(index))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rivet_macros::Bind;

    use super::*;
    use crate::scalar::ScalarValue;

    #[derive(Debug, Default, PartialEq, Bind)]
    #[serde(default)]
    struct Person {
        first_name: String,
        #[bind(path = "id")]
        id: i64,
    }

    #[derive(Debug, Default, PartialEq, Bind)]
    #[serde(default)]
    struct Paging {
        #[bind(query = "page", default = "1")]
        page: u32,
    }

    #[derive(Debug, Default, Bind)]
    #[serde(default)]
    struct Request {
        #[bind(flatten)]
        person: Person,
        #[bind(query = "name")]
        name: String,
        #[bind(flatten)]
        paging: Option<Box<Paging>>,
        #[bind(query = "limit")]
        limit: u8,
        body_only: Vec<String>,
    }

    #[derive(Debug, Default, Bind)]
    #[serde(default)]
    struct Listing {
        #[bind(flatten)]
        paging: Option<Paging>,
    }

    fn visited(target: &mut dyn Bind, tag: Tag) -> Vec<&'static str> {
        let mut seen = Vec::new();
        walk(target, tag, &mut |name, _| {
            seen.push(name);
            Ok(())
        })
        .unwrap();
        seen
    }

    #[test]
    fn test_walk_flattens_in_declaration_order() {
        let mut req = Request::default();
        assert_eq!(visited(&mut req, Tag::Query), vec!["name", "page", "limit"]);
        assert_eq!(visited(&mut req, Tag::Path), vec!["id"]);
        assert_eq!(visited(&mut req, Tag::Header), Vec::<&str>::new());
    }

    #[test]
    fn test_walk_allocates_embedded_option() {
        let mut req = Request::default();
        assert!(req.paging.is_none());

        visited(&mut req, Tag::Path);
        assert_eq!(req.paging.as_deref(), Some(&Paging::default()));
    }

    #[test]
    fn test_walk_allocates_unboxed_option() {
        let mut listing = Listing::default();
        assert!(matches!(
            Listing::struct_shape().fields[0].kind,
            crate::shape::FieldKind::Embedded { lazy: true, .. }
        ));

        assert_eq!(visited(&mut listing, Tag::Query), vec!["page"]);
        assert_eq!(listing.paging, Some(Paging::default()));
    }

    #[test]
    fn test_walk_assigns_through_slots() {
        let mut req = Request::default();
        walk(&mut req, Tag::Query, &mut |name, slot| {
            if let FieldSlot::Scalar(slot) = slot {
                let value = match name {
                    "name" => ScalarValue::Str("User Name".into()),
                    _ => ScalarValue::Uint(7),
                };
                slot.assign(value).unwrap();
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(req.name, "User Name");
        assert_eq!(req.limit, 7);
        assert_eq!(req.paging.unwrap().page, 7);
    }

    #[test]
    fn test_derived_shape() {
        let shape = Request::struct_shape();
        assert_eq!(shape.name, "Request");
        let names: Vec<_> = shape.flattened().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["first_name", "id", "name", "page", "limit", "body_only"]
        );
        assert!(shape.lint().is_empty());
    }

    #[test]
    fn test_walk_stops_on_first_error() {
        let mut req = Request::default();
        let mut calls = 0;
        let result = walk(&mut req, Tag::Query, &mut |name, _| {
            calls += 1;
            Err(crate::BindError::invalid(name))
        });
        assert_eq!(result, Err(crate::BindError::invalid("name")));
        assert_eq!(calls, 1);
    }
}
