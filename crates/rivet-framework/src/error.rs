//! Error types for the Rivet framework.

use rivet_core::BindError;
use thiserror::Error;

/// A boxed error returned by a handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can end an adapted handler invocation.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The input could not be bound or failed validation. The handler did not run.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The handler itself returned an error.
    #[error("{0}")]
    Handler(BoxError),

    /// The handler's output could not be serialized to JSON.
    #[error("failed to serialize handler output: {0}")]
    Output(#[source] serde_json::Error),
}

impl HandlerError {
    /// Returns `true` when the request itself was at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Bind(_))
    }

    /// Returns the binding error, if that is what this is.
    pub fn as_bind_error(&self) -> Option<&BindError> {
        match self {
            Self::Bind(err) => Some(err),
            _ => None,
        }
    }

    /// Attempts to downcast a handler error to a concrete type.
    pub fn downcast_handler_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Handler(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// The normalized outcome of one handler invocation.
///
/// `Ok(None)` for handlers with no output, `Ok(Some(value))` otherwise.
pub type HandlerResult = Result<Option<serde_json::Value>, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error, PartialEq)]
    #[error("user not found")]
    struct NotFound;

    #[test]
    fn test_bind_errors_are_client_errors() {
        let err = HandlerError::from(BindError::invalid("age"));
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "'1' invalid parameter(s): age");
        assert_eq!(err.as_bind_error(), Some(&BindError::invalid("age")));
    }

    #[test]
    fn test_handler_error_passes_through() {
        let err = HandlerError::Handler(Box::new(NotFound));
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "user not found");
        assert_eq!(err.downcast_handler_error::<NotFound>(), Some(&NotFound));
    }
}
