//! Transport error types.

use http::Method;
use thiserror::Error;

/// Errors raised while building or running the HTTP host.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A route uses a method the router cannot dispatch on.
    #[error("unsupported method `{method}` for route `{path}`")]
    UnsupportedMethod { method: Method, path: String },

    /// The server loop failed.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
