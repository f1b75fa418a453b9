//! Route compilation entry point.
//!
//! # Responsibilities
//! - Validate every declared route
//! - Build one routing trie, rejecting conflicts
//! - Synthesize renderable locations and method maps
//! - Reject method-map variable names shared by different paths or not
//!   usable as nginx variables
//!
//! # Design Decisions
//! - Pure and synchronous; the trie lives only for the duration of the call
//! - Any error aborts the whole compilation, there is no partial output
//! - Same input always yields the same output, whatever the route order

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::routing::route::{InvalidRoute, Route};
use crate::routing::synth::{synthesize, Location, MethodMap};
use crate::routing::trie::{ConflictError, RoutingTrie};

/// Errors aborting a compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("invalid route: {0}")]
    InvalidRoute(#[from] InvalidRoute),

    #[error("route conflict: {0}")]
    Conflict(#[from] ConflictError),

    #[error("paths {first_path} and {second_path} both derive the method map variable ${var_name}")]
    VariableCollision {
        var_name: String,
        first_path: String,
        second_path: String,
    },

    #[error("path {path} derives the method map variable ${var_name}, which may only contain ASCII letters, digits and '_'")]
    InvalidVariableName { var_name: String, path: String },
}

/// Output of a compilation, ready to hand to a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderableConfig {
    pub locations: Vec<Location>,
    pub method_maps: Vec<MethodMap>,
}

impl RenderableConfig {
    /// Total number of locations, nested ones included.
    pub fn location_count(&self) -> usize {
        fn count(locations: &[Location]) -> usize {
            locations.iter().map(|l| 1 + count(&l.children)).sum()
        }
        count(&self.locations)
    }
}

/// Compile declared routes into a proxy configuration.
pub fn compile(routes: &[Route]) -> Result<RenderableConfig, CompileError> {
    for route in routes {
        route.validate()?;
    }

    let trie = RoutingTrie::from_routes(routes)?;
    let (locations, method_maps) = synthesize(trie.root());

    let config = RenderableConfig {
        locations,
        method_maps,
    };
    check_variable_names(&config)?;

    tracing::info!(
        routes = routes.len(),
        locations = config.location_count(),
        method_maps = config.method_maps.len(),
        "Routes compiled"
    );
    Ok(config)
}

fn is_variable_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_variable_names(config: &RenderableConfig) -> Result<(), CompileError> {
    let map_names: HashSet<&str> = config.method_maps.iter().map(|m| m.var_name.as_str()).collect();
    let mut owners: HashMap<&str, &str> = HashMap::new();
    let mut pending: Vec<&Location> = config.locations.iter().collect();

    while let Some(location) = pending.pop() {
        pending.extend(location.children.iter());
        // Literal upstreams may start with `$` too; only map variables count.
        let Some(var_name) = location
            .target
            .strip_prefix('$')
            .filter(|name| map_names.contains(name))
        else {
            continue;
        };
        if !is_variable_name(var_name) {
            return Err(CompileError::InvalidVariableName {
                var_name: var_name.to_string(),
                path: location.path.clone(),
            });
        }
        if let Some(first_path) = owners.insert(var_name, location.path.as_str()) {
            let (first_path, second_path) = if first_path <= location.path.as_str() {
                (first_path, location.path.as_str())
            } else {
                (location.path.as_str(), first_path)
            };
            return Err(CompileError::VariableCollision {
                var_name: var_name.to_string(),
                first_path: first_path.to_string(),
                second_path: second_path.to_string(),
            });
        }
    }
    Ok(())
}
