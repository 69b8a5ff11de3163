//! # Rivet Framework
//!
//! The handler-facing layer on top of `rivet-core`:
//!
//! - [`RequestContext`]: the per-request source the binder reads from
//! - [`Handler`]: Axum-style blanket impls turning async functions into
//!   handlers, with the input bound and validated before the call
//! - [`Routes`] / [`RouteTable`]: registration and the frozen route table
//!
//! ```rust,ignore
//! use rivet_framework::{BoxError, Json, RequestContext, Routes};
//!
//! async fn get_user(ctx: Arc<RequestContext>, req: GetUserRequest) -> Result<Json<User>, BoxError> {
//!     // ...
//! }
//!
//! let table = Routes::new().get("/users/{id}", get_user).freeze();
//! ```

pub mod context;
pub mod error;
pub mod handler;
pub mod routes;

pub use context::{RequestContext, RequestContextBuilder};
pub use error::{BoxError, HandlerError, HandlerResult};
pub use handler::{
    Arity, BindOptions, ErasedHandler, Handler, HandlerDescriptor, HandlerOutput, InputDescriptor,
    IntoHandlerResult, Json, into_handler,
};
pub use routes::{Route, RouteTable, Routes};
