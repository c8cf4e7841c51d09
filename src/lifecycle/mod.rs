//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (coordinator.rs):
//!     Acquire guard (guard.rs) → Capture identity (identity.rs)
//!     → Resolve config → Start node → Publish node → Spawn scheduler
//!
//! Running:
//!     Wait for the first of:
//!         ShutdownHandle::trigger() (shutdown.rs)
//!         SIGINT/SIGQUIT/SIGTERM (signals.rs)
//!
//! Shutdown (coordinator.rs):
//!     Stop node → Clear published node → Stop scheduler → Release guard
//! ```
//!
//! # Design Decisions
//! - At most one run per lifecycle; a concurrent listen is a logged no-op
//! - Startup failures are fatal, no partial rollback beyond releasing the guard
//! - No teardown deadline: a blocking collaborator blocks the teardown

pub mod coordinator;
pub mod guard;
pub mod identity;
pub mod shutdown;
pub mod signals;

pub use coordinator::{
    Lifecycle, LifecycleBuilder, ListenOutcome, Node, NodeBuilder, RunReport, Scheduler,
};
pub use guard::RunGuard;
pub use identity::AppIdentity;
pub use shutdown::{ShutdownHandle, ShutdownReason};
