//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! lifecycle coordinator produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured fields (addresses, reason, uptime) instead of formatted strings
//! - Metrics are cheap and recorder-agnostic

pub mod logging;
pub mod metrics;
