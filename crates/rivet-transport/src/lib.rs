//! # Rivet Transport
//!
//! Hosts a frozen [`RouteTable`](rivet_framework::RouteTable) on a real
//! HTTP server.
//!
//! ## Features
//!
//! - `http-server`: the axum host in [`http`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rivet_transport::http::{RouterSettings, bind, build_router, serve};
//!
//! let table = Routes::new().get("/users/{id}", get_user).freeze();
//! let router = build_router(&table, RouterSettings::default())?;
//! serve(bind("0.0.0.0:8000").await?, router, shutdown_signal()).await?;
//! ```

pub mod error;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{TransportError, TransportResult};
