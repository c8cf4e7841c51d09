//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries
//! - Honour `RUST_LOG`, falling back to a configured default
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Library code only emits events; installing a subscriber is the binary's job

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `default_level` is used when `RUST_LOG` is unset or invalid, e.g. `"info"`
/// or `"quantum=debug"`.
pub fn init_logging(default_level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
