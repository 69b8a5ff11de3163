//! The [`Handler`] trait and its blanket implementations.
//!
//! Handlers are plain async functions. The accepted shapes are
//!
//! ```text
//! async fn(Arc<RequestContext>)           -> Result<O, E>
//! async fn(Arc<RequestContext>, T: Bind)  -> Result<O, E>
//! ```
//!
//! where `O: HandlerOutput` (`()` for "no output") and `E: Into<BoxError>`.
//! Anything else fails to satisfy [`Handler`] and is rejected by the
//! compiler when it is registered:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use rivet_framework::{BoxError, RequestContext, Routes};
//!
//! async fn too_many(_ctx: Arc<RequestContext>, _a: u32, _b: u32) -> Result<(), BoxError> {
//!     Ok(())
//! }
//!
//! let _ = Routes::new().get("/x", too_many);
//! ```
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use rivet_framework::{BoxError, RequestContext, Routes};
//!
//! // `String` is not a bindable struct.
//! async fn not_a_struct(_ctx: Arc<RequestContext>, _input: String) -> Result<(), BoxError> {
//!     Ok(())
//! }
//!
//! let _ = Routes::new().get("/x", not_a_struct);
//! ```
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use rivet_framework::{RequestContext, Routes};
//!
//! // No error outcome.
//! async fn infallible(_ctx: Arc<RequestContext>) {}
//!
//! let _ = Routes::new().get("/x", infallible);
//! ```
//!
//! ```compile_fail
//! use rivet_framework::{BoxError, Routes};
//!
//! // The context must come first.
//! async fn no_context() -> Result<(), BoxError> {
//!     Ok(())
//! }
//!
//! let _ = Routes::new().get("/x", no_context);
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;
use rivet_core::{Bind, bind_input};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::descriptor::{HandlerDescriptor, InputDescriptor};
use super::output::{HandlerOutput, IntoHandlerResult};
use crate::context::RequestContext;
use crate::error::{HandlerError, HandlerResult};

/// Per-invocation switches, taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOptions {
    /// Run `validator` rules on inputs that opt in with `#[bind(validate)]`.
    pub validate: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// An async function usable as a Rivet handler.
///
/// Implemented for every function with one of the accepted shapes; there is
/// no need to implement it by hand.
pub trait Handler<Args>: Clone + Send + Sync + 'static {
    /// Binds the input (if any), calls the handler and normalizes its return.
    fn call(self, ctx: Arc<RequestContext>, options: BindOptions) -> BoxFuture<'static, HandlerResult>;

    /// Describes this handler's shape.
    fn descriptor(&self) -> HandlerDescriptor;
}

impl<F, Fut, Res> Handler<()> for F
where
    F: FnOnce(Arc<RequestContext>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoHandlerResult,
{
    fn call(self, ctx: Arc<RequestContext>, _options: BindOptions) -> BoxFuture<'static, HandlerResult> {
        Box::pin(async move {
            let output = (self)(ctx)
                .await
                .into_handler_result()
                .map_err(HandlerError::Handler)?;
            output.into_value().map_err(HandlerError::Output)
        })
    }

    fn descriptor(&self) -> HandlerDescriptor {
        HandlerDescriptor {
            name: std::any::type_name::<F>(),
            input: None,
            output: <Res::Output as HandlerOutput>::output_type(),
        }
    }
}

impl<F, Fut, Res, T> Handler<(T,)> for F
where
    F: FnOnce(Arc<RequestContext>, T) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoHandlerResult,
    T: Bind + Default + DeserializeOwned + Send + 'static,
{
    fn call(self, ctx: Arc<RequestContext>, options: BindOptions) -> BoxFuture<'static, HandlerResult> {
        Box::pin(async move {
            let input: T = bind_input(&*ctx)?;
            if options.validate {
                input.validate_input()?;
            }

            let output = (self)(ctx, input)
                .await
                .into_handler_result()
                .map_err(HandlerError::Handler)?;
            output.into_value().map_err(HandlerError::Output)
        })
    }

    fn descriptor(&self) -> HandlerDescriptor {
        HandlerDescriptor {
            name: std::any::type_name::<F>(),
            input: Some(InputDescriptor {
                type_name: std::any::type_name::<T>(),
                shape: T::struct_shape(),
            }),
            output: <Res::Output as HandlerOutput>::output_type(),
        }
    }
}

// ============================================================================
// ErasedHandler - type-erased handler stored in the route table
// ============================================================================

type BoxedCall =
    Arc<dyn Fn(Arc<RequestContext>, BindOptions) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// A type-erased handler together with its cached descriptor.
#[derive(Clone)]
pub struct ErasedHandler {
    descriptor: Arc<HandlerDescriptor>,
    call: BoxedCall,
}

impl ErasedHandler {
    pub fn descriptor(&self) -> &HandlerDescriptor {
        &self.descriptor
    }

    /// Invokes the handler with a clone of the original function.
    pub fn call(&self, ctx: Arc<RequestContext>, options: BindOptions) -> BoxFuture<'static, HandlerResult> {
        debug!(handler = self.descriptor.name, path = ctx.path(), "Invoking handler");
        (self.call)(ctx, options)
    }
}

impl std::fmt::Debug for ErasedHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedHandler")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Erases a handler, computing and logging its descriptor.
///
/// Shape lints (tagged fields of unsupported types, default literals that do
/// not coerce) are reported as warnings; requests that reach those fields
/// will fail with an invalid-parameter error.
pub fn into_handler<H, Args>(handler: H) -> ErasedHandler
where
    H: Handler<Args>,
    Args: 'static,
{
    let descriptor = handler.descriptor();
    info!(
        handler = descriptor.name,
        arity = %descriptor.arity(),
        input = descriptor.input.map(|i| i.type_name),
        output = descriptor.output,
        "Handler registered"
    );
    for lint in descriptor.lints() {
        warn!(handler = descriptor.name, %lint, "Handler input will fail to bind");
    }

    ErasedHandler {
        descriptor: Arc::new(descriptor),
        call: Arc::new(move |ctx, options| handler.clone().call(ctx, options)),
    }
}
