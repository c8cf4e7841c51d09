//! Resolution of the effective node configuration.
//!
//! Two strictly separate phases:
//! 1. apply every [`Opt`] in order (last write wins)
//! 2. derive implicit fields from the result
//!
//! Derivation only fills the retry interval and, in singleton mode, the client
//! address. Nothing here fails; inconsistent cluster settings are left for the
//! node to reject.

use crate::config::options::Opt;
use crate::config::schema::{NodeConfig, DEFAULT_RETRY_INTERVAL};

/// Result of [`resolve`].
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: NodeConfig,
    /// Set when the client address was inferred from the service address.
    pub singleton_inferred: bool,
}

/// Build the configuration for a run listening on `service_addr`.
pub fn resolve<'a, I>(service_addr: &str, opts: I) -> Resolved
where
    I: IntoIterator<Item = &'a Opt>,
{
    let mut config = NodeConfig::default();
    for opt in opts {
        opt.apply(&mut config);
    }
    config.service_addr = service_addr.to_string();

    let singleton_inferred = derive_defaults(&mut config);
    Resolved {
        config,
        singleton_inferred,
    }
}

/// Fill implicit fields. Returns whether singleton inference happened.
pub fn derive_defaults(config: &mut NodeConfig) -> bool {
    if config.retry_interval.is_zero() {
        config.retry_interval = DEFAULT_RETRY_INTERVAL;
    }

    if !config.is_master && config.advertise_addr.is_empty() && config.client_addr.is_empty() {
        config.client_addr = config.service_addr.clone();
        return true;
    }
    false
}
