//! Runtime error types.

use rivet_transport::TransportError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while starting or running an application.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP transport failed to bind or serve.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
