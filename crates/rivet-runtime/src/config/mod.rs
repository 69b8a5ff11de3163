//! Configuration for Rivet applications.
//!
//! Settings are read with figment from defaults, optional TOML/YAML files and
//! `RIVET_*` environment variables, then checked by [`validate_config`].

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BindingConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, RivetConfig,
    ServerConfig, SpanEventConfig,
};
pub use validation::validate_config;
