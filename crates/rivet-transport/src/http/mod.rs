//! axum-based HTTP host.
//!
//! - [`server`]: route table → axum router, listener binding, serve loop
//! - [`response`]: handler results → HTTP responses

pub mod response;
pub mod server;

pub use response::{error_response, render, status_of};
pub use server::{DEFAULT_MAX_BODY_BYTES, RouterSettings, bind, build_router, serve};
