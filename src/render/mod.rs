//! Rendering of compiled routes into proxy configuration text.
//!
//! # Data Flow
//! ```text
//! RenderableConfig (locations + method maps)
//!     → nginx.rs (nginx.conf: maps, server, nested locations, 405 guards)
//!     → json.rs (structural dump for inspection and tooling)
//!     → String written by the caller
//! ```
//!
//! # Design Decisions
//! - Renderers only format; every structural decision is made by the compiler
//! - Output is deterministic so repeated deployments produce identical files

pub mod json;
pub mod nginx;

use thiserror::Error;

use crate::routing::RenderableConfig;

pub use json::JsonRenderer;
pub use nginx::{NginxRenderer, NginxSettings};

/// Errors raised while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("formatting failed: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Turns a compiled configuration into text.
pub trait Renderer {
    fn render(&self, config: &RenderableConfig) -> Result<String, RenderError>;
}
