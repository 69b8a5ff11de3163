//! Configuration validation utilities.

use std::net::SocketAddr;

use super::error::{ConfigError, ConfigResult};
use super::schema::{BindingConfig, LogOutput, LoggingConfig, RivetConfig, ServerConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &RivetConfig) -> ConfigResult<()> {
    validate_server_config(&config.server)?;
    validate_binding_config(&config.binding)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_server_config(server: &ServerConfig) -> ConfigResult<()> {
    if server.addr.is_empty() {
        return Err(ConfigError::missing_field("server.addr"));
    }

    server
        .addr
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::invalid_addr(&server.addr, e.to_string()))?;

    Ok(())
}

fn validate_binding_config(binding: &BindingConfig) -> ConfigResult<()> {
    if binding.max_body_bytes == 0 {
        return Err(ConfigError::validation(
            "binding.max_body_bytes must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid logging filter module name: {module:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RivetConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_addr() {
        let mut config = RivetConfig::default();
        config.server.addr = "localhost".into();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidAddr { .. })
        ));

        config.server.addr.clear();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_zero_body_limit() {
        let mut config = RivetConfig::default();
        config.binding.max_body_bytes = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_file_output_needs_path() {
        let mut config = RivetConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));

        config.logging.file_path = Some("logs/rivet.log".into());
        config.logging.filters.insert(" ".into(), LogLevel::Debug);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
