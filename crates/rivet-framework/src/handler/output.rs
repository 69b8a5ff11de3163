//! Handler return values.
//!
//! A handler returns `Result<O, E>` where `O: HandlerOutput` and `E` converts
//! into a [`BoxError`]. `O = ()` is a handler with no output; every other
//! output type is serialized to a [`serde_json::Value`].

use serde::Serialize;
use serde_json::Value;

use crate::error::BoxError;

/// Wraps any serializable value as a handler output.
///
/// ```rust,ignore
/// async fn get_user(ctx: Arc<RequestContext>, req: GetUserRequest) -> Result<Json<User>, BoxError> {
///     Ok(Json(User { id: req.user.id, ..Default::default() }))
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

/// A value a handler may produce on success.
pub trait HandlerOutput: Send + 'static {
    /// Name of the produced type, or `None` for handlers with no output.
    fn output_type() -> Option<&'static str>;

    /// Serializes the output. `Ok(None)` means "nothing to send".
    fn into_value(self) -> Result<Option<Value>, serde_json::Error>;
}

impl HandlerOutput for () {
    fn output_type() -> Option<&'static str> {
        None
    }

    fn into_value(self) -> Result<Option<Value>, serde_json::Error> {
        Ok(None)
    }
}

impl HandlerOutput for Value {
    fn output_type() -> Option<&'static str> {
        Some(std::any::type_name::<Value>())
    }

    fn into_value(self) -> Result<Option<Value>, serde_json::Error> {
        Ok(Some(self))
    }
}

impl<T> HandlerOutput for Json<T>
where
    T: Serialize + Send + 'static,
{
    fn output_type() -> Option<&'static str> {
        Some(std::any::type_name::<T>())
    }

    fn into_value(self) -> Result<Option<Value>, serde_json::Error> {
        serde_json::to_value(self.0).map(Some)
    }
}

/// Records the pointee type.
impl<T: HandlerOutput> HandlerOutput for Box<T> {
    fn output_type() -> Option<&'static str> {
        T::output_type()
    }

    fn into_value(self) -> Result<Option<Value>, serde_json::Error> {
        (*self).into_value()
    }
}

/// `None` is sent as no output.
impl<T: HandlerOutput> HandlerOutput for Option<T> {
    fn output_type() -> Option<&'static str> {
        T::output_type()
    }

    fn into_value(self) -> Result<Option<Value>, serde_json::Error> {
        match self {
            Some(inner) => inner.into_value(),
            None => Ok(None),
        }
    }
}

/// The complete return type of a handler's future.
pub trait IntoHandlerResult: Send + 'static {
    /// The success type.
    type Output: HandlerOutput;

    /// Splits the return value into output or handler error.
    fn into_handler_result(self) -> Result<Self::Output, BoxError>;
}

impl<O, E> IntoHandlerResult for Result<O, E>
where
    O: HandlerOutput,
    E: Into<BoxError> + Send + 'static,
{
    type Output = O;

    fn into_handler_result(self) -> Result<O, BoxError> {
        self.map_err(Into::into)
    }
}
