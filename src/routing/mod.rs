//! Gateway route compiler.
//!
//! # Data Flow
//! ```text
//! Route[] (resolved targets)
//!     → route.rs (structural validation)
//!     → trie.rs (prefix tree by path segment, conflict detection)
//!     → synth.rs (post-order walk → Location tree + MethodMap list)
//!     → compiler.rs (variable-name collision check)
//!     → RenderableConfig
//! ```
//!
//! # Design Decisions
//! - Routes compiled once per deployment, output is immutable
//! - Deterministic: same routes always yield the same config
//! - Nested locations mirror prefix containment, so a request to
//!   `/messages/new` never falls back to the `/messages` upstream

pub mod compiler;
pub mod route;
pub mod synth;
pub mod trie;

pub use compiler::{compile, CompileError, RenderableConfig};
pub use route::{HttpMethod, InvalidRoute, Route};
pub use synth::{Location, MethodMap};
pub use trie::{ConflictError, RoutingTrie};
