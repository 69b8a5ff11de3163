//! Static field descriptors for bindable types.
//!
//! A [`StructShape`] is computed once per type (normally as a `static`
//! emitted by `#[derive(Bind)]`) and never changes. It records, per field,
//! the binding tags, the coercion kind and whether the field is an embedded
//! struct whose fields are flattened into the parent.
//!
//! Shapes describe types; [`Bind::field_mut`](crate::Bind::field_mut)
//! reaches into values. The walker combines both.

use std::fmt;

use crate::error::CoerceError;
use crate::scalar::{ScalarKind, coerce};

/// A binding tag a field can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Path variable, e.g. `id` in `/users/{id}`.
    Path,
    /// Query parameter.
    Query,
    /// Header or request-scoped value.
    Header,
    /// Literal applied when the field is still zero after extraction.
    Default,
}

impl Tag {
    /// Extraction tags in pipeline order.
    pub const EXTRACTORS: [Tag; 3] = [Tag::Path, Tag::Query, Tag::Header];

    /// Returns the attribute key for this tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tag values declared on a single field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags {
    pub path: Option<&'static str>,
    pub query: Option<&'static str>,
    pub header: Option<&'static str>,
    pub default: Option<&'static str>,
}

impl Tags {
    /// A field with no binding tags.
    pub const NONE: Tags = Tags {
        path: None,
        query: None,
        header: None,
        default: None,
    };

    /// Returns the value for `tag`. Empty values count as absent.
    pub fn get(&self, tag: Tag) -> Option<&'static str> {
        let value = match tag {
            Tag::Path => self.path,
            Tag::Query => self.query,
            Tag::Header => self.header,
            Tag::Default => self.default,
        };
        value.filter(|v| !v.is_empty())
    }

    /// Returns the single extraction source of this field, if any.
    ///
    /// When more than one extraction tag is present (only possible for
    /// hand-written shapes) the earliest in pipeline order is reported.
    pub fn source(&self) -> Option<(Tag, &'static str)> {
        Tag::EXTRACTORS
            .into_iter()
            .find_map(|tag| self.get(tag).map(|value| (tag, value)))
    }

    /// Number of extraction tags declared on this field.
    pub fn source_count(&self) -> usize {
        Tag::EXTRACTORS
            .into_iter()
            .filter(|tag| self.get(*tag).is_some())
            .count()
    }
}

/// What kind of value a field holds.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A coercible scalar.
    Scalar(ScalarKind),
    /// Anything else; the type name is kept for error messages.
    Unsupported(&'static str),
    /// An embedded struct whose fields are flattened into the parent.
    Embedded {
        /// Shape of the embedded type.
        shape: fn() -> &'static StructShape,
        /// `true` for `Option<_>` fields, which are allocated on first visit.
        lazy: bool,
    },
}

/// Descriptor of one struct field.
#[derive(Debug, Clone, Copy)]
pub struct FieldShape {
    pub name: &'static str,
    pub kind: FieldKind,
    pub tags: Tags,
}

impl FieldShape {
    pub fn is_embedded(&self) -> bool {
        matches!(self.kind, FieldKind::Embedded { .. })
    }
}

/// Descriptor of a bindable struct type.
#[derive(Debug)]
pub struct StructShape {
    pub name: &'static str,
    pub fields: &'static [FieldShape],
}

/// A suspicious field declaration found by [`StructShape::lint`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeLint {
    /// A tagged field whose type cannot be coerced.
    ///
    /// A present path, query or header value for it fails binding. Its
    /// default is never applied; only the body can fill it.
    UnsupportedField {
        field: &'static str,
        type_name: &'static str,
    },
    /// A default literal that does not coerce to the field's kind.
    InvalidDefault {
        field: &'static str,
        literal: &'static str,
        error: CoerceError,
    },
    /// A field bound from more than one extraction source.
    MultipleSources { field: &'static str },
}

impl fmt::Display for ShapeLint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedField { field, type_name } => {
                write!(
                    f,
                    "field `{field}` is tagged but `{type_name}` is not bindable; \
                     only the body can set it"
                )
            }
            Self::InvalidDefault {
                field,
                literal,
                error,
            } => write!(f, "default {literal:?} of field `{field}` is invalid: {error}"),
            Self::MultipleSources { field } => {
                write!(f, "field `{field}` declares more than one binding source")
            }
        }
    }
}

impl StructShape {
    /// Leaf fields in walk order: declaration order, embedded fields expanded in place.
    pub fn flattened(&self) -> Vec<&'static FieldShape> {
        let mut out = Vec::with_capacity(self.fields.len());
        self.collect_flattened(&mut out);
        out
    }

    fn collect_flattened(&self, out: &mut Vec<&'static FieldShape>) {
        for field in self.fields {
            match field.kind {
                FieldKind::Embedded { shape, .. } => shape().collect_flattened(out),
                _ => out.push(field),
            }
        }
    }

    /// Position of a leaf field in walk order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.flattened().iter().position(|field| field.name == name)
    }

    /// Checks the declared tags against the field kinds.
    ///
    /// None of these are fatal; the same problems surface per request as
    /// invalid-parameter errors. They are reported at registration time so
    /// they show up in logs before the first request does.
    pub fn lint(&self) -> Vec<ShapeLint> {
        let mut lints = Vec::new();
        for field in self.flattened() {
            if field.tags.source_count() > 1 {
                lints.push(ShapeLint::MultipleSources { field: field.name });
            }

            let tagged = field.tags.source().is_some() || field.tags.get(Tag::Default).is_some();
            match field.kind {
                FieldKind::Unsupported(type_name) if tagged => {
                    lints.push(ShapeLint::UnsupportedField {
                        field: field.name,
                        type_name,
                    });
                }
                FieldKind::Scalar(kind) => {
                    let Some(literal) = field.tags.get(Tag::Default) else {
                        continue;
                    };
                    if let Err(error) = coerce(literal, kind) {
                        lints.push(ShapeLint::InvalidDefault {
                            field: field.name,
                            literal,
                            error,
                        });
                    }
                }
                _ => {}
            }
        }
        lints
    }
}
