//! Path-segment prefix tree.
//!
//! # Responsibilities
//! - Insert routes segment by segment, creating structural nodes on the way
//! - Merge method-scoped routes that share a path
//! - Reject ambiguous or duplicate method bindings
//!
//! # Design Decisions
//! - Owned recursive nodes; children in a `BTreeMap` for deterministic walks
//! - Empty and whitespace-only segments are skipped, so `/a//b/` and `/a/b`
//!   address the same node; the stored path stays the literal route path
//! - A failed insert leaves the trie untouched

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use thiserror::Error;

use crate::routing::route::{HttpMethod, Route};

/// What a node proxies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    /// Purely structural: no route terminates here.
    NoTarget,
    /// Any method goes to one upstream.
    Single(String),
    /// Each bound method has its own upstream.
    Methods(BTreeMap<HttpMethod, String>),
}

/// Two routes cannot share a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("route '{incoming}' conflicts with '{existing}': a route without methods cannot share path {path}")]
    MethodAgnostic {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("method {method} on {path} is bound to both {existing_target} and {new_target}")]
    DuplicateMethod {
        path: String,
        method: HttpMethod,
        existing_target: String,
        new_target: String,
    },
}

/// One node of the routing trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingNode {
    pub path: String,
    pub targets: Targets,
    pub children: BTreeMap<String, RoutingNode>,
}

impl RoutingNode {
    fn structural() -> Self {
        Self {
            path: String::new(),
            targets: Targets::NoTarget,
            children: BTreeMap::new(),
        }
    }

    fn targets_for(route: &Route) -> Targets {
        let methods = route.declared_methods();
        if methods.is_empty() {
            Targets::Single(route.target.clone())
        } else {
            Targets::Methods(
                methods
                    .iter()
                    .map(|m| (*m, route.target.clone()))
                    .collect(),
            )
        }
    }

    /// Bind `route` to this node, which is the node its path addresses.
    fn bind(&mut self, route: &Route) -> Result<(), ConflictError> {
        let methods = route.declared_methods();
        match &mut self.targets {
            Targets::NoTarget => {
                self.path = route.path.clone();
                self.targets = Self::targets_for(route);
                Ok(())
            }
            Targets::Single(_) => Err(self.ambiguity(route)),
            Targets::Methods(_) if methods.is_empty() => Err(self.ambiguity(route)),
            Targets::Methods(bound) => {
                if let Some((method, existing)) = methods
                    .iter()
                    .find_map(|m| bound.get(m).map(|t| (*m, t)))
                {
                    return Err(ConflictError::DuplicateMethod {
                        path: self.path.clone(),
                        method,
                        existing_target: existing.clone(),
                        new_target: route.target.clone(),
                    });
                }
                for method in methods {
                    bound.insert(*method, route.target.clone());
                }
                Ok(())
            }
        }
    }

    fn ambiguity(&self, route: &Route) -> ConflictError {
        ConflictError::MethodAgnostic {
            path: self.path.clone(),
            existing: self.describe(),
            incoming: route.to_string(),
        }
    }

    /// Human-readable summary of the routes bound at this node.
    fn describe(&self) -> String {
        match &self.targets {
            Targets::NoTarget => String::new(),
            Targets::Single(target) => format!("* {} -> {}", self.path, target),
            Targets::Methods(bound) => bound
                .iter()
                .map(|(m, t)| format!("{} {} -> {}", m, self.path, t))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Prefix tree of declared routes, rooted at the synthetic segment `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTrie {
    root: RoutingNode,
}

impl Default for RoutingTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingTrie {
    pub fn new() -> Self {
        Self {
            root: RoutingNode::structural(),
        }
    }

    /// Build a trie from every route, stopping at the first conflict.
    pub fn from_routes<'a>(routes: impl IntoIterator<Item = &'a Route>) -> Result<Self, ConflictError> {
        let mut trie = Self::new();
        for route in routes {
            trie.insert(route)?;
        }
        Ok(trie)
    }

    pub fn root(&self) -> &RoutingNode {
        &self.root
    }

    /// Insert a validated route.
    pub fn insert(&mut self, route: &Route) -> Result<(), ConflictError> {
        let segments: Vec<&str> = route
            .path
            .split('/')
            .filter(|s| !s.trim().is_empty())
            .collect();

        let Some((last, parents)) = segments.split_last() else {
            tracing::debug!(route = %route, "Binding route at root");
            return self.root.bind(route);
        };

        let mut node = &mut self.root;
        for segment in parents {
            node = node
                .children
                .entry((*segment).to_string())
                .or_insert_with(RoutingNode::structural);
        }

        match node.children.entry((*last).to_string()) {
            Entry::Vacant(slot) => {
                tracing::debug!(route = %route, "Inserting leaf");
                slot.insert(RoutingNode {
                    path: route.path.clone(),
                    targets: RoutingNode::targets_for(route),
                    children: BTreeMap::new(),
                });
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                tracing::debug!(route = %route, "Merging into existing node");
                slot.get_mut().bind(route)
            }
        }
    }
}
