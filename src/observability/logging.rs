//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, CLI and environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Logs go to stderr; stdout is reserved for generated configuration
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a log level, scoped to this crate.
pub fn default_directive(level: &str) -> String {
    format!("faas_gateway={}", level.to_lowercase())
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .is_ok()
}
