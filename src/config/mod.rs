//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & translate into Opt list)
//! caller / command-line options
//!     → loader::merge (appended after file options, last write wins)
//!     → resolver.rs (apply in order, then derive defaults)
//!     → validation.rs (advisories, logged only)
//!     → NodeConfig handed to the node
//! ```
//!
//! # Design Decisions
//! - Mutators are plain values applied in caller order
//! - Derivation is a separate phase after all mutators
//! - Resolution never fails; the node validates cluster settings

pub mod loader;
pub mod options;
pub mod resolver;
pub mod schema;
pub mod validation;

pub use loader::{load_config, merge, ConfigError};
pub use options::{
    with_advertise_addr, with_client_addr, with_components, with_master, with_retry_interval, Opt,
};
pub use resolver::{resolve, Resolved};
pub use schema::{FileConfig, NodeConfig, DEFAULT_RETRY_INTERVAL};
