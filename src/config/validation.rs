//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port > 0, known log level)
//! - Detect duplicate or unnamed functions
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Route-level checks belong to the compiler, not here

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("gateway.listen_port must be greater than 0")]
    InvalidPort,

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    #[error("function #{index} has an empty name")]
    UnnamedFunction { index: usize },

    #[error("function '{0}' is declared more than once")]
    DuplicateFunction(String),

    #[error("deployed address of '{0}' is empty")]
    EmptyDeployedAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.gateway.listen_port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for (index, function) in config.functions.iter().enumerate() {
        if function.name.trim().is_empty() {
            errors.push(ValidationError::UnnamedFunction { index });
        } else if !seen.insert(function.name.as_str()) {
            errors.push(ValidationError::DuplicateFunction(function.name.clone()));
        }
    }

    for (name, address) in &config.deployed {
        if address.trim().is_empty() {
            errors.push(ValidationError::EmptyDeployedAddress(name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
