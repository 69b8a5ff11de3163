//! The handler adapter.
//!
//! - **Traits** ([`traits`]): the [`Handler`] trait, implemented for async
//!   functions of the accepted shapes, and the type-erased [`ErasedHandler`]
//! - **Output** ([`output`]): [`HandlerOutput`] and [`IntoHandlerResult`],
//!   which normalize handler returns to `Result<Option<Value>, HandlerError>`
//! - **Descriptor** ([`descriptor`]): the [`HandlerDescriptor`] computed once
//!   at registration
//!
//! # Invocation
//!
//! ```text
//! Arc<RequestContext>
//!     → bind_input::<T>()      body → path → query → header → defaults
//!     → T::validate_input()    only for #[bind(validate)] types
//!     → handler(ctx, input).await
//!     → Ok(Some(value)) | Ok(None) | Err(HandlerError)
//! ```
//!
//! A binding or validation failure returns before the handler runs.

pub mod descriptor;
pub mod output;
pub mod traits;

pub use descriptor::{Arity, HandlerDescriptor, InputDescriptor};
pub use output::{HandlerOutput, IntoHandlerResult, Json};
pub use traits::{BindOptions, ErasedHandler, Handler, into_handler};
