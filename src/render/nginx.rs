//! nginx reverse-proxy configuration.
//!
//! # Output Layout
//! ```text
//! events {}
//! http {
//!     map $request_method $<var> { GET "..."; default ""; }   one per method map
//!     server {
//!         listen <port>;
//!         location <path> {
//!             if ($request_method ~ ^(PUT|PATCH)$) { return 405; }
//!             proxy_pass <target>;
//!             location <child path> { ... }                    nested children
//!         }
//!     }
//! }
//! ```
//!
//! # Design Decisions
//! - Methods missing from a map resolve to the empty string; the location's
//!   405 guard rejects them before `proxy_pass` is reached
//! - Child locations are nested so nginx picks the longest matching prefix
//!   inside its parent

use std::fmt::Write;

use crate::config::schema::ServerConfig;
use crate::render::{RenderError, Renderer};
use crate::routing::{Location, MethodMap, RenderableConfig};

const INDENT: &str = "    ";

/// Server-level settings of the generated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NginxSettings {
    pub listen_port: u16,
    pub server_name: Option<String>,
    pub resolver: Option<String>,
}

impl Default for NginxSettings {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for NginxSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            listen_port: config.listen_port,
            server_name: config.server_name.clone(),
            resolver: config.resolver.clone(),
        }
    }
}

/// Renders an nginx.conf for the gateway container.
#[derive(Debug, Clone, Default)]
pub struct NginxRenderer {
    settings: NginxSettings,
}

impl NginxRenderer {
    pub fn new(settings: NginxSettings) -> Self {
        Self { settings }
    }

    fn write_map(out: &mut String, map: &MethodMap) -> std::fmt::Result {
        let pad = INDENT;
        writeln!(out, "{pad}map $request_method ${} {{", map.var_name)?;
        for (method, target) in &map.method_to_target {
            writeln!(out, "{pad}{INDENT}{} {};", method, quote(target))?;
        }
        writeln!(out, "{pad}{INDENT}default \"\";")?;
        writeln!(out, "{pad}}}")?;
        writeln!(out)
    }

    fn write_location(out: &mut String, location: &Location, depth: usize) -> std::fmt::Result {
        let pad = INDENT.repeat(depth);
        writeln!(out, "{pad}location {} {{", location.path)?;

        if !location.unallowed_methods.is_empty() {
            let methods: Vec<&str> = location.unallowed_methods.iter().map(|m| m.as_str()).collect();
            writeln!(
                out,
                "{pad}{INDENT}if ($request_method ~ ^({})$) {{",
                methods.join("|")
            )?;
            writeln!(out, "{pad}{INDENT}{INDENT}return 405;")?;
            writeln!(out, "{pad}{INDENT}}}")?;
        }
        writeln!(out, "{pad}{INDENT}proxy_pass {};", location.target)?;

        for child in &location.children {
            writeln!(out)?;
            Self::write_location(out, child, depth + 1)?;
        }

        writeln!(out, "{pad}}}")
    }

    fn write_config(&self, out: &mut String, config: &RenderableConfig) -> std::fmt::Result {
        writeln!(out, "# Generated by faas-gateway. Do not edit.")?;
        writeln!(out, "events {{}}")?;
        writeln!(out)?;
        writeln!(out, "http {{")?;

        for map in &config.method_maps {
            Self::write_map(out, map)?;
        }

        writeln!(out, "{INDENT}server {{")?;
        writeln!(out, "{INDENT}{INDENT}listen {};", self.settings.listen_port)?;
        if let Some(server_name) = &self.settings.server_name {
            writeln!(out, "{INDENT}{INDENT}server_name {server_name};")?;
        }
        if let Some(resolver) = &self.settings.resolver {
            writeln!(out, "{INDENT}{INDENT}resolver {resolver};")?;
        }
        writeln!(out, "{INDENT}{INDENT}proxy_ssl_server_name on;")?;

        for location in &config.locations {
            writeln!(out)?;
            Self::write_location(out, location, 2)?;
        }

        writeln!(out, "{INDENT}}}")?;
        writeln!(out, "}}")
    }
}

impl Renderer for NginxRenderer {
    fn render(&self, config: &RenderableConfig) -> Result<String, RenderError> {
        if !config.method_maps.is_empty() && self.settings.resolver.is_none() {
            tracing::warn!("Method maps are rendered without a resolver; nginx needs one to resolve variable upstreams");
        }

        let mut out = String::new();
        self.write_config(&mut out, config)?;
        Ok(out)
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
