//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (route inserts, synthesized locations, compile summary)
//!     → logging.rs (subscriber + filter, written to stderr)
//! ```
//!
//! # Design Decisions
//! - Structured fields rather than interpolated messages
//! - Per-route detail at debug level, summaries at info

pub mod logging;

pub use logging::init_logging;
