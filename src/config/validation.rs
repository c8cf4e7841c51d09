//! Advisory checks on a resolved configuration.
//!
//! # Design Decisions
//! - Never rejects: cluster invariants belong to the node
//! - Returns every advisory, not just the first
//! - Pure function: &NodeConfig → Vec<Advisory>

use std::fmt;

use crate::config::schema::NodeConfig;

/// A suspicious but accepted configuration combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Master role without an address to announce to peers.
    MasterWithoutAdvertiseAddr,
    /// Client and service address are identical in cluster mode.
    ClientEqualsServiceAddr { addr: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MasterWithoutAdvertiseAddr => {
                write!(f, "master node has no advertise address")
            }
            Advisory::ClientEqualsServiceAddr { addr } => {
                write!(f, "client and service address are both {} in cluster mode", addr)
            }
        }
    }
}

/// Collect advisories for `config`.
pub fn advisories(config: &NodeConfig) -> Vec<Advisory> {
    let mut out = Vec::new();

    if config.is_master && config.advertise_addr.is_empty() {
        out.push(Advisory::MasterWithoutAdvertiseAddr);
    }
    if !config.is_singleton()
        && !config.client_addr.is_empty()
        && config.client_addr == config.service_addr
    {
        out.push(Advisory::ClientEqualsServiceAddr {
            addr: config.client_addr.clone(),
        });
    }
    out
}
