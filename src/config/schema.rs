//! Configuration schema definitions.
//!
//! [`NodeConfig`] is the resolved configuration handed to the node for one
//! run. [`FileConfig`] is the on-disk representation a base configuration can
//! be loaded from.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::component::Components;

/// Retry interval used when none is configured.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(3);

/// Resolved configuration for one run.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Whether this node coordinates the cluster.
    pub is_master: bool,

    /// Address announced to peers (cluster mode).
    pub advertise_addr: String,

    /// Address exposed to external clients.
    pub client_addr: String,

    /// Address passed to `listen`; always set after resolution.
    pub service_addr: String,

    /// Backoff interval for the node's retry logic.
    pub retry_interval: Duration,

    /// Registry passed through to the node untouched.
    pub components: Components,
}

impl NodeConfig {
    /// Whether the node runs standalone (no master role, no advertise address).
    pub fn is_singleton(&self) -> bool {
        !self.is_master && self.advertise_addr.is_empty()
    }
}

/// Root of a TOML configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// Node options.
    pub node: NodeSection,
}

/// `[node]` table of a configuration file.
///
/// Every field is optional so that a file only overrides what it names.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NodeSection {
    pub is_master: Option<bool>,
    pub advertise_addr: Option<String>,
    pub client_addr: Option<String>,

    /// Retry interval in milliseconds.
    pub retry_interval_ms: Option<u64>,
}
