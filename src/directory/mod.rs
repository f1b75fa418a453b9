//! Function directory lookup.
//!
//! # Data Flow
//! ```text
//! FunctionConfig[] (name, path, methods)
//!     → FunctionDirectory::lookup(name) → deployed address
//!     → https://<address> (checked with `url`)
//!     → Route[] handed to the compiler
//! ```
//!
//! # Design Decisions
//! - Lookup is a trait so the compiler never knows where addresses come from
//! - Functions without a path have no gateway route and are skipped
//! - A routed function that is not deployed is an error, not a silent skip

use std::collections::BTreeMap;

use thiserror::Error;
use url::Url;

use crate::config::schema::FunctionConfig;
use crate::routing::route::{InvalidRoute, Route};

/// Lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("function '{0}' is not deployed")]
    NotDeployed(String),
}

/// Failure turning declared functions into routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("function '{function}' has an invalid address '{address}': {source}")]
    InvalidAddress {
        function: String,
        address: String,
        source: url::ParseError,
    },

    #[error("function '{function}': {source}")]
    InvalidRoute {
        function: String,
        source: InvalidRoute,
    },
}

/// Resolves a function name to its deployed address.
pub trait FunctionDirectory {
    fn lookup(&self, function: &str) -> Result<String, LookupError>;
}

/// Directory backed by a fixed name → address table.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    deployed: BTreeMap<String, String>,
}

impl StaticDirectory {
    pub fn new(deployed: BTreeMap<String, String>) -> Self {
        Self { deployed }
    }

    pub fn insert(&mut self, function: impl Into<String>, address: impl Into<String>) {
        self.deployed.insert(function.into(), address.into());
    }
}

impl FunctionDirectory for StaticDirectory {
    fn lookup(&self, function: &str) -> Result<String, LookupError> {
        self.deployed
            .get(function)
            .cloned()
            .ok_or_else(|| LookupError::NotDeployed(function.to_string()))
    }
}

/// Build the upstream URL for a deployed address.
///
/// Bare domain names are served over HTTPS; addresses that already carry a
/// scheme are kept as they are.
pub fn upstream_url(address: &str) -> Result<String, url::ParseError> {
    let address = address.trim();
    let candidate = if address.contains("://") {
        address.to_string()
    } else {
        format!("https://{address}")
    };
    Url::parse(&candidate)?;
    Ok(candidate)
}

/// Resolve every routed function into a route with a concrete target.
pub fn resolve_routes<D: FunctionDirectory + ?Sized>(
    functions: &[FunctionConfig],
    directory: &D,
) -> Result<Vec<Route>, ResolveError> {
    let mut routes = Vec::new();

    for function in functions {
        let Some(path) = &function.path else {
            tracing::debug!(function = %function.name, "Function has no gateway route");
            continue;
        };

        let address = directory.lookup(&function.name)?;
        let target = upstream_url(&address).map_err(|source| ResolveError::InvalidAddress {
            function: function.name.clone(),
            address: address.clone(),
            source,
        })?;

        let route = Route::parse(path.clone(), function.methods.as_deref(), target).map_err(|source| {
            ResolveError::InvalidRoute {
                function: function.name.clone(),
                source,
            }
        })?;

        tracing::debug!(function = %function.name, route = %route, "Resolved route");
        routes.push(route);
    }

    Ok(routes)
}
