//! Shared utilities for integration tests.

use faas_gateway::routing::{HttpMethod, Location, RenderableConfig, Route};

/// Build a route restricted to `methods` (empty means any method).
pub fn route(path: &str, methods: &[HttpMethod], target: &str) -> Route {
    let route = Route::new(path, target);
    if methods.is_empty() {
        route
    } else {
        route.with_methods(methods.iter().copied())
    }
}

/// Find a location by path anywhere in the tree.
#[allow(dead_code)]
pub fn find_location<'a>(locations: &'a [Location], path: &str) -> Option<&'a Location> {
    locations.iter().find_map(|l| {
        if l.path == path {
            Some(l)
        } else {
            find_location(&l.children, path)
        }
    })
}

/// Flatten the location tree into `(path, parent path)` pairs, sorted.
#[allow(dead_code)]
pub fn flatten(config: &RenderableConfig) -> Vec<(String, Option<String>)> {
    fn walk(locations: &[Location], parent: Option<&str>, out: &mut Vec<(String, Option<String>)>) {
        for location in locations {
            out.push((location.path.clone(), parent.map(str::to_string)));
            walk(&location.children, Some(&location.path), out);
        }
    }
    let mut out = Vec::new();
    walk(&config.locations, None, &mut out);
    out.sort();
    out
}
