//! Quantum process lifecycle orchestrator.
//!
//! Starts a server node (standalone or as a cluster member) from a listen
//! address and an ordered list of configuration options, keeps a background
//! scheduler alive while it runs, and tears both down in a fixed order when
//! an OS termination signal or an explicit shutdown request arrives.
//!
//! # Architecture Overview
//!
//! ```text
//!   listen(addr, opts)
//!         │
//!         ▼
//!   ┌───────────┐   ┌──────────────┐   ┌──────────────┐
//!   │ RunGuard  │──▶│ config       │──▶│ Node         │ (collaborator)
//!   │ (one run) │   │ resolve()    │   │ startup()    │
//!   └───────────┘   └──────────────┘   └──────┬───────┘
//!                                             ▼
//!                                     ┌──────────────┐
//!                                     │ Scheduler    │ (spawned task)
//!                                     └──────┬───────┘
//!                                            ▼
//!                         wait: ShutdownHandle::trigger() | OS signal
//!                                            ▼
//!                node.shutdown → clear node → stop scheduler → release guard
//! ```

pub mod component;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use component::Components;
pub use config::{NodeConfig, Opt};
pub use error::{LifecycleError, NodeError};
pub use lifecycle::{
    Lifecycle, LifecycleBuilder, ListenOutcome, Node, NodeBuilder, RunReport, Scheduler,
    ShutdownHandle, ShutdownReason,
};

/// Current quantum version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
