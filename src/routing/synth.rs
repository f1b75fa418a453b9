//! Flattening of the routing trie into renderable records.
//!
//! Post-order walk: children first, then the node classifies itself.
//! Structural nodes are invisible in the output; their children are hoisted
//! into the nearest ancestor that has a target.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::routing::route::HttpMethod;
use crate::routing::trie::{RoutingNode, Targets};

/// A path-match block of the proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    /// Literal upstream, or `$<var_name>` when the path is method-multiplexed.
    pub target: String,
    /// Methods answered with 405 at this path.
    pub unallowed_methods: Vec<HttpMethod>,
    pub children: Vec<Location>,
}

/// A request-method keyed lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodMap {
    pub var_name: String,
    pub method_to_target: BTreeMap<HttpMethod, String>,
}

/// Derive the map variable name for a path: `/a/b` becomes `a_b_target`.
pub fn method_map_var_name(path: &str) -> String {
    let replaced = path.replace('/', "_");
    let stem = replaced.strip_prefix('_').unwrap_or(&replaced);
    format!("{stem}_target")
}

fn unallowed(bound: &BTreeMap<HttpMethod, String>) -> Vec<HttpMethod> {
    HttpMethod::ALL
        .into_iter()
        .filter(|m| !bound.contains_key(m))
        .collect()
}

/// Synthesize the locations and method maps rooted at `node`.
pub fn synthesize(node: &RoutingNode) -> (Vec<Location>, Vec<MethodMap>) {
    let mut children = Vec::new();
    let mut maps = Vec::new();
    for child in node.children.values() {
        let (locations, child_maps) = synthesize(child);
        children.extend(locations);
        maps.extend(child_maps);
    }

    let location = match &node.targets {
        Targets::NoTarget => return (children, maps),
        Targets::Single(target) => Location {
            path: node.path.clone(),
            target: target.clone(),
            unallowed_methods: Vec::new(),
            children,
        },
        Targets::Methods(bound) => {
            let target = match bound.values().next() {
                Some(only) if bound.len() == 1 => only.clone(),
                _ => {
                    let var_name = method_map_var_name(&node.path);
                    maps.push(MethodMap {
                        var_name: var_name.clone(),
                        method_to_target: bound.clone(),
                    });
                    format!("${var_name}")
                }
            };
            Location {
                path: node.path.clone(),
                target,
                unallowed_methods: unallowed(bound),
                children,
            }
        }
    };

    tracing::debug!(
        path = %location.path,
        target = %location.target,
        children = location.children.len(),
        "Synthesized location"
    );
    (vec![location], maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::Route;
    use crate::routing::trie::RoutingTrie;
    use HttpMethod::*;

    fn synth(routes: &[Route]) -> (Vec<Location>, Vec<MethodMap>) {
        synthesize(RoutingTrie::from_routes(routes).unwrap().root())
    }

    #[test]
    fn test_var_name() {
        assert_eq!(method_map_var_name("/messages"), "messages_target");
        assert_eq!(method_map_var_name("/a/b"), "a_b_target");
        assert_eq!(method_map_var_name("/"), "_target");
        assert_eq!(method_map_var_name("/a/"), "a__target");
    }

    #[test]
    fn test_single_target_has_no_guard() {
        let (locations, maps) = synth(&[Route::new("/", "https://fn-a")]);
        assert!(maps.is_empty());
        assert_eq!(
            locations,
            vec![Location {
                path: "/".into(),
                target: "https://fn-a".into(),
                unallowed_methods: vec![],
                children: vec![],
            }]
        );
    }

    #[test]
    fn test_single_method_guard() {
        let (locations, _) = synth(&[Route::new("/health", "H").with_methods([Put])]);
        assert_eq!(locations[0].unallowed_methods, vec![Get, Post, Delete, Patch]);
        assert_eq!(locations[0].target, "H");
    }

    #[test]
    fn test_multi_method_map() {
        let (locations, maps) = synth(&[
            Route::new("/messages", "A").with_methods([Get]),
            Route::new("/messages", "B").with_methods([Post]),
        ]);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].target, "$messages_target");
        assert_eq!(locations[0].unallowed_methods, vec![Put, Delete, Patch]);
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].var_name, "messages_target");
        assert_eq!(maps[0].method_to_target[&Get], "A");
        assert_eq!(maps[0].method_to_target[&Post], "B");
    }

    #[test]
    fn test_all_methods_bound_leaves_no_guard() {
        let (locations, _) = synth(&[
            Route::new("/a", "A").with_methods([Get, Post, Put]),
            Route::new("/a", "B").with_methods([Delete, Patch]),
        ]);
        assert!(locations[0].unallowed_methods.is_empty());
    }

    #[test]
    fn test_structural_nodes_are_hoisted() {
        let (locations, _) = synth(&[Route::new("/a/b", "B"), Route::new("/a/c", "C")]);
        let paths: Vec<&str> = locations.iter().map(|l| l.path.as_str()).collect();
        assert_eq!(paths, vec!["/a/b", "/a/c"]);
        assert!(locations.iter().all(|l| l.children.is_empty()));
    }

    #[test]
    fn test_child_maps_propagate_through_structural_nodes() {
        let (locations, maps) = synth(&[
            Route::new("/x/y", "A").with_methods([Get]),
            Route::new("/x/y", "B").with_methods([Post]),
        ]);
        assert_eq!(locations.len(), 1);
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].var_name, "x_y_target");
    }

    #[test]
    fn test_children_nest_under_target() {
        let (locations, maps) = synth(&[
            Route::new("/", "ROOT"),
            Route::new("/messages", "A").with_methods([Get]),
            Route::new("/messages/new", "B").with_methods([Post]),
            Route::new("/messages/new", "C").with_methods([Delete]),
        ]);
        assert_eq!(locations.len(), 1);
        let root = &locations[0];
        assert_eq!(root.path, "/");
        assert_eq!(root.children.len(), 1);
        let messages = &root.children[0];
        assert_eq!(messages.path, "/messages");
        assert_eq!(messages.target, "A");
        assert_eq!(messages.children.len(), 1);
        assert_eq!(messages.children[0].target, "$messages_new_target");
        assert_eq!(maps.len(), 1);
    }
}
