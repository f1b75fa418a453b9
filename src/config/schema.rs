//! Configuration schema definitions.
//!
//! This module defines the gateway configuration file structure.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for a gateway deployment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Settings of the generated proxy server.
    pub gateway: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Declared functions and their optional routes.
    pub functions: Vec<FunctionConfig>,

    /// Deployed functions: function name to deployed domain name or URL.
    pub deployed: BTreeMap<String, String>,
}

/// Settings of the generated proxy server block.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the gateway listens on.
    pub listen_port: u16,

    /// Optional `server_name`.
    pub server_name: Option<String>,

    /// DNS resolver used to resolve upstreams selected through a method map.
    pub resolver: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: 8080,
            server_name: None,
            resolver: None,
        }
    }
}

/// A declared function handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FunctionConfig {
    /// Function name, as deployed on the platform.
    pub name: String,

    /// Gateway path routed to this function. No path means no gateway route.
    #[serde(default)]
    pub path: Option<String>,

    /// Methods accepted on `path`. Absent means any method.
    #[serde(default)]
    pub methods: Option<Vec<String>>,
}

impl FunctionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            methods: None,
        }
    }

    pub fn routed(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.gateway.listen_port, 8080);
        assert!(config.gateway.resolver.is_none());
        assert_eq!(config.observability.log_level, "info");
        assert!(config.functions.is_empty());
    }

    #[test]
    fn test_deserialize_full() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [gateway]
            listen_port = 9000
            resolver = "1.1.1.1"

            [[functions]]
            name = "hello"
            path = "/hello"
            methods = ["GET", "POST"]

            [[functions]]
            name = "cron"

            [deployed]
            hello = "hello-abc.functions.example.cloud"
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.listen_port, 9000);
        assert_eq!(config.gateway.resolver.as_deref(), Some("1.1.1.1"));
        assert_eq!(config.functions.len(), 2);
        assert_eq!(config.functions[0].path.as_deref(), Some("/hello"));
        assert_eq!(
            config.functions[0].methods,
            Some(vec!["GET".to_string(), "POST".to_string()])
        );
        assert!(config.functions[1].path.is_none());
        assert_eq!(config.deployed["hello"], "hello-abc.functions.example.cloud");
    }
}
