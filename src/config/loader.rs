//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    tracing::debug!(
        path = %path.display(),
        functions = config.functions.len(),
        deployed = config.deployed.len(),
        "Configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let err = parse_config("[gateway\nlisten_port = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_message() {
        let err = parse_config(
            r#"
            [gateway]
            listen_port = 0

            [observability]
            log_level = "chatty"
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: gateway.listen_port must be greater than 0, unknown log level 'chatty'"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/gateway.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
