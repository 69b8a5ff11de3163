//! Error types for binding and coercion.

use thiserror::Error;

use crate::scalar::ScalarKind;

/// Failure to turn one raw string into a field's scalar type.
///
/// These never reach the host directly: the binder reports them as
/// [`BindError::InvalidParam`] carrying the external parameter name.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    /// The literal does not parse as the target kind.
    #[error("invalid {kind} literal {value:?}")]
    Parse {
        /// Target kind.
        kind: ScalarKind,
        /// Offending literal.
        value: String,
    },

    /// The literal parses but does not fit the target bit width.
    #[error("{value:?} is out of range for {kind}")]
    OutOfRange {
        /// Target kind.
        kind: ScalarKind,
        /// Offending literal.
        value: String,
    },

    /// The field type is not one of the bindable scalar kinds.
    #[error("unsupported parameter type: {0}")]
    Unsupported(&'static str),

    /// A coerced value was handed to a field of a different kind.
    #[error("a {got} value cannot be assigned to a {expected} field")]
    Mismatch {
        /// Kind of the receiving field.
        expected: ScalarKind,
        /// Kind of the value that was produced.
        got: &'static str,
    },
}

/// Errors produced while binding or validating a handler input.
#[derive(Debug, Error)]
pub enum BindError {
    /// One or more parameters were present but malformed.
    #[error("'{}' invalid parameter(s): {}", .0.len(), .0.join(", "))]
    InvalidParam(Vec<String>),

    /// One or more required parameters were absent.
    #[error("'{}' missing parameter(s): {}", .0.len(), .0.join(", "))]
    MissingParam(Vec<String>),

    /// The body could not be decoded for a reason other than a field type mismatch.
    #[error("failed to decode request body: {0}")]
    Body(#[source] serde_json::Error),
}

impl BindError {
    /// Creates an invalid-parameter error for a single parameter.
    pub fn invalid(param: impl Into<String>) -> Self {
        Self::InvalidParam(vec![param.into()])
    }

    /// Creates a missing-parameter error for a single parameter.
    pub fn missing(param: impl Into<String>) -> Self {
        Self::MissingParam(vec![param.into()])
    }

    /// Returns the offending parameter names, if this error carries any.
    pub fn params(&self) -> Option<&[String]> {
        match self {
            Self::InvalidParam(params) | Self::MissingParam(params) => Some(params),
            Self::Body(_) => None,
        }
    }
}

impl PartialEq for BindError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidParam(a), Self::InvalidParam(b)) => a == b,
            (Self::MissingParam(a), Self::MissingParam(b)) => a == b,
            (Self::Body(a), Self::Body(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Result type for binding operations.
pub type BindResult<T> = Result<T, BindError>;
