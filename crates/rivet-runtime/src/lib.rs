//! Rivet Runtime - configuration, logging and serving for Rivet applications.
//!
//! This crate provides:
//! - Layered configuration (`RivetConfig`, `ConfigLoader`)
//! - Logging setup (`LoggingBuilder`, `SpanEvents`)
//! - The application runner (`RivetApp`)
//!
//! ```ignore
//! use rivet_runtime::RivetApp;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = RivetApp::new();
//!     app.get("/users/{id}", get_user);
//!
//!     // Run until Ctrl+C
//!     app.run().await?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod logging;

pub use app::{AppBuilder, RivetApp, shutdown_signal};
pub use config::{ConfigError, ConfigLoader, ConfigResult, RivetConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros and span helpers.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
