//! Declarative validation through the `validator` crate.
//!
//! Rule failures are split into two kinds:
//!
//! - **missing**: any failing rule with code `required`
//! - **invalid**: everything else
//!
//! A field is reported once. If anything is missing, the result is
//! [`BindError::MissingParam`] listing only the missing fields; otherwise
//! [`BindError::InvalidParam`] lists the invalid ones. Errors from
//! `#[validate(nested)]` fields are flattened into the parent, matching how
//! embedded fields are bound. Field order follows the struct's walk order.

use tracing::debug;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{BindError, BindResult};
use crate::shape::StructShape;
use crate::walker::Bind;

/// Rule code treated as a missing-parameter failure.
pub const REQUIRED_CODE: &str = "required";

/// Validates `input` and translates failures into a [`BindError`].
pub fn validate_struct<T>(input: &T) -> BindResult<()>
where
    T: Validate + Bind,
{
    match input.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let err = classify(&errors, input.shape());
            debug!(input = input.shape().name, error = %err, "Input failed validation");
            Err(err)
        }
    }
}

/// Splits validation failures into a missing- or invalid-parameter error.
pub fn classify(errors: &ValidationErrors, shape: &StructShape) -> BindError {
    let mut failures: Vec<(String, bool)> = Vec::new();
    collect(errors, &mut failures);

    failures.sort_by(|(a, _), (b, _)| {
        let rank = |name: &str| shape.position(name).unwrap_or(usize::MAX);
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    });

    let missing: Vec<String> = failures
        .iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| name.clone())
        .collect();

    if missing.is_empty() {
        BindError::InvalidParam(failures.into_iter().map(|(name, _)| name).collect())
    } else {
        BindError::MissingParam(missing)
    }
}

fn collect(errors: &ValidationErrors, out: &mut Vec<(String, bool)>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(rules) => {
                let missing = rules.iter().any(|rule| rule.code == REQUIRED_CODE);
                record(out, field.to_string(), missing);
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, out),
            ValidationErrorsKind::List(_) => record(out, field.to_string(), false),
        }
    }
}

fn record(out: &mut Vec<(String, bool)>, field: String, missing: bool) {
    match out.iter_mut().find(|(name, _)| *name == field) {
        Some(entry) => entry.1 |= missing,
        None => out.push((field, missing)),
    }
}
