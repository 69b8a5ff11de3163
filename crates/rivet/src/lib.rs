//! # Rivet
//!
//! Typed request binding and handler adapters for HTTP services.
//!
//! ## Overview
//!
//! Handlers are plain async functions taking the request context and,
//! optionally, one input struct. Rivet populates the input from the JSON
//! body, then path variables, query parameters and headers, applies declared
//! defaults, validates it and normalizes the handler's return value.
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌─────────────────────────┐    ┌──────────┐
//! │  axum    │───▶│ RouteTable   │───▶│ Handler adapter         │───▶│ handler  │
//! │ (server) │    │ (method+path)│    │ body→path→query→header  │    │  fn      │
//! └──────────┘    └──────────────┘    │ defaults → validation   │    └──────────┘
//!                                     └─────────────────────────┘
//! ```
//!
//! - **Core**: field shapes, scalar coercion and the binder
//! - **Framework**: request context, handler adapters and routes
//! - **Transport**: serving a route table over HTTP
//! - **Runtime**: configuration, logging and the application runner
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rivet::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize, Bind)]
//! #[serde(default)]
//! struct GetUser {
//!     #[bind(path = "id")]
//!     id: i64,
//!     #[bind(query = "age", default = "21")]
//!     age: u32,
//! }
//!
//! async fn get_user(_ctx: Arc<RequestContext>, req: GetUser) -> Result<Json<String>, BoxError> {
//!     Ok(Json(format!("user {} is {}", req.id, req.age)))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = RivetApp::new();
//!     app.get("/users/{id}", get_user);
//!     app.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! The derive expands to paths under `::rivet_core`, so crates using it
//! depend on `rivet-core` alongside `rivet`.
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log lines
//! - `http-server` *(default)*: serve routes with axum

pub use rivet_core as core;
pub use rivet_framework as framework;
pub use rivet_runtime as runtime;
pub use rivet_transport as transport;

pub use rivet_macros::Bind;

/// Commonly used types for writing handlers and starting an app.
///
/// ```rust,ignore
/// use rivet::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    // Runtime - main entry point
    pub use rivet_runtime::{RivetApp, RivetConfig};

    // Binding
    pub use rivet_core::{BindError, BindResult};
    pub use rivet_macros::Bind;

    // Handlers
    pub use rivet_framework::{
        BoxError, Handler, HandlerError, Json, RequestContext, Routes,
    };

    // Logging macros
    pub use rivet_runtime::prelude::*;
}
