//! The per-request binding pipeline.
//!
//! [`bind_input`] runs, in order and each over the whole struct:
//!
//! 1. [`decode_body`]: JSON body via `serde_json`
//! 2. [`bind_path`]: `#[bind(path = "..")]` fields
//! 3. [`bind_query`]: `#[bind(query = "..")]` fields
//! 4. [`bind_headers`]: `#[bind(header = "..")]` fields
//! 5. [`apply_defaults`]: `#[bind(default = "..")]` on fields still zero
//!
//! The first failing stage ends the pipeline.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use serde_path_to_error::Segment;
use tracing::{debug, trace};

use crate::error::{BindError, BindResult, CoerceError};
use crate::shape::Tag;
use crate::source::RequestSource;
use crate::walker::{Bind, FieldSlot, walk};

/// Builds a fresh input of type `T` from `source`.
pub fn bind_input<T, R>(source: &R) -> BindResult<T>
where
    T: Bind + Default + DeserializeOwned,
    R: RequestSource + ?Sized,
{
    let mut input: T = decode_body(source.body())?;
    bind_path(source, &mut input)?;
    bind_query(source, &mut input)?;
    bind_headers(source, &mut input)?;
    apply_defaults(&mut input)?;

    debug!(input = T::struct_shape().name, "Bound handler input");
    Ok(input)
}

/// Decodes a JSON body into a fresh `T`.
///
/// An empty (or whitespace-only) body decodes to `T::default()`. A JSON value
/// of the wrong type for a field becomes [`BindError::InvalidParam`] naming
/// that field's JSON key; every other failure is returned as
/// [`BindError::Body`].
pub fn decode_body<T>(body: &[u8]) -> BindResult<T>
where
    T: Bind + Default + DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let field = err
            .path()
            .iter()
            .filter_map(|segment| match segment {
                Segment::Map { key } => Some(key.clone()),
                _ => None,
            })
            .last();
        let inner = err.into_inner();
        if !is_type_mismatch(&inner) {
            return BindError::Body(inner);
        }

        // Errors raised inside `#[serde(flatten)]` carry no key path.
        match field.or_else(|| locate_mismatch::<T>(body)) {
            Some(field) => {
                debug!(field = %field, error = %inner, "Body field has the wrong type");
                BindError::InvalidParam(vec![field])
            }
            None => BindError::Body(inner),
        }
    })?;
    de.end().map_err(BindError::Body)?;

    Ok(value)
}

/// Upper bound on the keys [`locate_mismatch`] decodes on their own.
const MAX_MISMATCH_CANDIDATES: usize = 32;

/// Finds the top-level key that fails to decode into `T` on its own.
///
/// Keys spelled like one of `T`'s leaf fields (ignoring case, `_` and `-`)
/// are tried first; at most [`MAX_MISMATCH_CANDIDATES`] keys are tried.
fn locate_mismatch<T: Bind + DeserializeOwned>(body: &[u8]) -> Option<String> {
    let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) else {
        return None;
    };

    let leaves: Vec<String> = T::struct_shape()
        .flattened()
        .iter()
        .map(|field| normalize_key(field.name))
        .collect();
    let (named, rest): (Vec<_>, Vec<_>) = map
        .into_iter()
        .partition(|(key, _)| leaves.contains(&normalize_key(key)));

    named
        .into_iter()
        .chain(rest)
        .take(MAX_MISMATCH_CANDIDATES)
        .find_map(|(key, value)| {
            let single = Value::Object(Map::from_iter([(key.clone(), value)]));
            match serde_json::from_value::<T>(single) {
                Err(e) if is_type_mismatch(&e) => Some(key),
                _ => None,
            }
        })
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// Matches the messages of serde's `de::Error::invalid_type` ("invalid type: ...")
// and `de::Error::invalid_value` ("invalid value: ..."), which serde_json
// reports as `Category::Data`.
fn is_type_mismatch(err: &serde_json::Error) -> bool {
    if err.classify() != serde_json::error::Category::Data {
        return false;
    }
    let message = err.to_string();
    message.starts_with("invalid type") || message.starts_with("invalid value")
}

/// Binds `#[bind(path = "..")]` fields from path variables.
pub fn bind_path<R>(source: &R, target: &mut dyn Bind) -> BindResult<()>
where
    R: RequestSource + ?Sized,
{
    bind_tag(target, Tag::Path, |name| source.path_param(name))
}

/// Binds `#[bind(query = "..")]` fields from query parameters.
pub fn bind_query<R>(source: &R, target: &mut dyn Bind) -> BindResult<()>
where
    R: RequestSource + ?Sized,
{
    bind_tag(target, Tag::Query, |name| source.query_param(name))
}

/// Binds `#[bind(header = "..")]` fields through [`RequestSource::header`].
pub fn bind_headers<R>(source: &R, target: &mut dyn Bind) -> BindResult<()>
where
    R: RequestSource + ?Sized,
{
    bind_tag(target, Tag::Header, |name| source.header(name))
}

fn bind_tag<'s, F>(target: &mut dyn Bind, tag: Tag, extract: F) -> BindResult<()>
where
    F: Fn(&str) -> Option<&'s str>,
{
    walk(target, tag, &mut |name, slot| {
        let Some(raw) = extract(name).filter(|raw| !raw.is_empty()) else {
            return Ok(());
        };

        trace!(%tag, param = name, value = raw, "Binding parameter");
        assign(slot, raw).map_err(|e| {
            debug!(%tag, param = name, error = %e, "Parameter rejected");
            BindError::invalid(name)
        })
    })
}

/// Applies `#[bind(default = "..")]` literals to fields still at their zero value.
///
/// An uncoercible literal is reported as an invalid parameter named by the literal.
/// Defaults on unsupported fields are skipped; registration lints them.
pub fn apply_defaults(target: &mut dyn Bind) -> BindResult<()> {
    walk(target, Tag::Default, &mut |literal, slot| match slot {
        FieldSlot::Scalar(field) if !field.is_zero() => Ok(()),
        FieldSlot::Unsupported(type_name) => {
            trace!(literal, type_name, "Skipping default on unsupported field");
            Ok(())
        }
        slot => {
            trace!(literal, "Applying default");
            assign(slot, literal).map_err(|e| {
                debug!(literal, error = %e, "Default literal rejected");
                BindError::invalid(literal)
            })
        }
    })
}

fn assign(slot: FieldSlot<'_>, raw: &str) -> Result<(), CoerceError> {
    match slot {
        FieldSlot::Scalar(field) => field.set_str(raw),
        FieldSlot::Unsupported(type_name) => Err(CoerceError::Unsupported(type_name)),
        FieldSlot::Embedded(inner) => Err(CoerceError::Unsupported(inner.shape().name)),
    }
}
