//! Gateway route compiler for a Functions-as-a-Service deployment helper.

pub mod config;
pub mod directory;
pub mod gateway;
pub mod observability;
pub mod render;
pub mod routing;

pub use config::GatewayConfig;
pub use gateway::{compile_gateway, CompiledGateway, GatewayError};
pub use routing::{compile, CompileError, RenderableConfig, Route};
