//! Route model and structural validation.
//!
//! # Responsibilities
//! - Define the fixed set of supported HTTP methods
//! - Hold a declared route (path, optional methods, upstream target)
//! - Reject structurally invalid routes before they reach the trie
//!
//! # Design Decisions
//! - Methods are a closed enum; unknown names fail at parse time
//! - `None` and an empty method list both mean "any method, no guard"
//! - Validation fails fast on the first violation
//! - Paths and targets are written verbatim into the proxy configuration, so
//!   whitespace and config metacharacters are rejected

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Supported HTTP methods, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Every supported method, in the order guards and maps are emitted.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a method name is not one of the supported methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown HTTP method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Structural violations found while validating a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRoute {
    #[error("route to {target} has an empty path")]
    EmptyPath { target: String },

    #[error("route path '{path}' must start with '/'")]
    RelativePath { path: String },

    #[error("route {path} declares unknown method '{method}'")]
    UnknownMethod { path: String, method: String },

    #[error("route path '{path}' contains {character:?}, which cannot appear in a proxy location")]
    UnsafePath { path: String, character: char },

    #[error("route {path} declares method {method} more than once")]
    DuplicateMethod { path: String, method: HttpMethod },

    #[error("route {path} has no target")]
    EmptyTarget { path: String },

    #[error("route {path} target '{target}' contains {character:?}, which cannot appear in proxy_pass")]
    UnsafeTarget {
        path: String,
        target: String,
        character: char,
    },
}

/// First character that would break an unquoted nginx directive argument.
fn unsafe_char(value: &str) -> Option<char> {
    value
        .chars()
        .find(|&c| c.is_whitespace() || matches!(c, ';' | '{' | '}' | '"' | '\'' | '\\' | '#'))
}

/// A declared binding of a path (and optional method set) to an upstream target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<HttpMethod>>,

    pub target: String,
}

impl Route {
    /// Create a route accepting any method.
    pub fn new(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            methods: None,
            target: target.into(),
        }
    }

    /// Restrict the route to the given methods.
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    /// Build a route from method names, rejecting names that are not supported.
    pub fn parse<S: AsRef<str>>(
        path: impl Into<String>,
        methods: Option<&[S]>,
        target: impl Into<String>,
    ) -> Result<Self, InvalidRoute> {
        let path = path.into();
        let methods = match methods {
            Some(names) => Some(
                names
                    .iter()
                    .map(|name| {
                        name.as_ref().parse::<HttpMethod>().map_err(|e| InvalidRoute::UnknownMethod {
                            path: path.clone(),
                            method: e.0,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        Ok(Self {
            path,
            methods,
            target: target.into(),
        })
    }

    /// Methods this route is restricted to; empty when it accepts any method.
    pub fn declared_methods(&self) -> &[HttpMethod] {
        self.methods.as_deref().unwrap_or(&[])
    }

    /// Check the route's structural invariants.
    pub fn validate(&self) -> Result<(), InvalidRoute> {
        if self.path.is_empty() {
            return Err(InvalidRoute::EmptyPath {
                target: self.target.clone(),
            });
        }
        if !self.path.starts_with('/') {
            return Err(InvalidRoute::RelativePath {
                path: self.path.clone(),
            });
        }
        if let Some(character) = unsafe_char(&self.path) {
            return Err(InvalidRoute::UnsafePath {
                path: self.path.clone(),
                character,
            });
        }

        let methods = self.declared_methods();
        for (i, method) in methods.iter().enumerate() {
            if methods[..i].contains(method) {
                return Err(InvalidRoute::DuplicateMethod {
                    path: self.path.clone(),
                    method: *method,
                });
            }
        }

        if self.target.is_empty() {
            return Err(InvalidRoute::EmptyTarget {
                path: self.path.clone(),
            });
        }
        if let Some(character) = unsafe_char(&self.target) {
            return Err(InvalidRoute::UnsafeTarget {
                path: self.path.clone(),
                target: self.target.clone(),
                character,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods = self.declared_methods();
        if methods.is_empty() {
            write!(f, "* {} -> {}", self.path, self.target)
        } else {
            let names: Vec<&str> = methods.iter().map(HttpMethod::as_str).collect();
            write!(f, "{} {} -> {}", names.join(","), self.path, self.target)
        }
    }
}
