//! End-to-end gateway configuration pipeline.
//!
//! Ties the configuration, the function directory and the compiler together:
//! declared functions are resolved to routes, compiled, then rendered.

use thiserror::Error;

use crate::config::GatewayConfig;
use crate::directory::{resolve_routes, FunctionDirectory, ResolveError, StaticDirectory};
use crate::render::{RenderError, Renderer};
use crate::routing::{compile, CompileError, RenderableConfig, Route};

/// Any failure of the pipeline.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Resolved routes and their compiled configuration.
#[derive(Debug, Clone)]
pub struct CompiledGateway {
    pub routes: Vec<Route>,
    pub config: RenderableConfig,
}

impl CompiledGateway {
    pub fn render(&self, renderer: &dyn Renderer) -> Result<String, GatewayError> {
        Ok(renderer.render(&self.config)?)
    }
}

/// Directory backed by the `[deployed]` table of the configuration.
pub fn directory_from_config(config: &GatewayConfig) -> StaticDirectory {
    StaticDirectory::new(config.deployed.clone())
}

/// Resolve and compile every routed function of `config`.
pub fn compile_gateway(
    config: &GatewayConfig,
    directory: &dyn FunctionDirectory,
) -> Result<CompiledGateway, GatewayError> {
    let routes = resolve_routes(&config.functions, directory)?;
    if routes.is_empty() {
        tracing::warn!("No function declares a gateway route");
    }

    let compiled = compile(&routes)?;
    Ok(CompiledGateway {
        routes,
        config: compiled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FunctionConfig;
    use crate::render::NginxRenderer;

    #[test]
    fn test_compile_gateway() {
        let mut config = GatewayConfig::default();
        config.functions.push(FunctionConfig::new("list").routed("/messages").with_methods(["GET"]));
        config.functions.push(FunctionConfig::new("post").routed("/messages").with_methods(["POST"]));
        config.deployed.insert("list".into(), "list.fn.example".into());
        config.deployed.insert("post".into(), "post.fn.example".into());

        let compiled = compile_gateway(&config, &directory_from_config(&config)).unwrap();
        assert_eq!(compiled.routes.len(), 2);
        assert_eq!(compiled.config.method_maps.len(), 1);

        let text = compiled.render(&NginxRenderer::default()).unwrap();
        assert!(text.contains("GET \"https://list.fn.example\";"));
    }

    #[test]
    fn test_conflict_surfaces() {
        let mut config = GatewayConfig::default();
        config.functions.push(FunctionConfig::new("a").routed("/x"));
        config.functions.push(FunctionConfig::new("b").routed("/x"));
        config.deployed.insert("a".into(), "a.fn.example".into());
        config.deployed.insert("b".into(), "b.fn.example".into());

        let err = compile_gateway(&config, &directory_from_config(&config)).unwrap_err();
        assert!(matches!(err, GatewayError::Compile(CompileError::Conflict(_))));
    }
}
