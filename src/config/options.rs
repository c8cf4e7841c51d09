//! Configuration mutators.
//!
//! A run is configured by an ordered list of [`Opt`] values. Each one sets a
//! field of [`NodeConfig`]; they are applied in the order given, so a later
//! option overrides an earlier one touching the same field.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::component::Components;
use crate::config::schema::NodeConfig;

type CustomFn = Arc<dyn Fn(&mut NodeConfig) + Send + Sync>;

/// A single configuration mutator.
#[derive(Clone)]
pub enum Opt {
    /// Mark the node as cluster coordinator.
    Master,
    /// Set the address announced to peers.
    AdvertiseAddr(String),
    /// Set the address exposed to clients.
    ClientAddr(String),
    /// Override the default retry interval.
    RetryInterval(Duration),
    /// Attach a component registry.
    Components(Components),
    /// Arbitrary mutation of the configuration.
    Custom(CustomFn),
}

impl Opt {
    /// Wrap an arbitrary mutation.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&mut NodeConfig) + Send + Sync + 'static,
    {
        Opt::Custom(Arc::new(f))
    }

    /// Apply this option to `config`.
    pub fn apply(&self, config: &mut NodeConfig) {
        match self {
            Opt::Master => config.is_master = true,
            Opt::AdvertiseAddr(addr) => config.advertise_addr = addr.clone(),
            Opt::ClientAddr(addr) => config.client_addr = addr.clone(),
            Opt::RetryInterval(interval) => config.retry_interval = *interval,
            Opt::Components(components) => config.components = components.clone(),
            Opt::Custom(f) => f(config),
        }
    }
}

impl fmt::Debug for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opt::Master => f.write_str("Master"),
            Opt::AdvertiseAddr(addr) => f.debug_tuple("AdvertiseAddr").field(addr).finish(),
            Opt::ClientAddr(addr) => f.debug_tuple("ClientAddr").field(addr).finish(),
            Opt::RetryInterval(d) => f.debug_tuple("RetryInterval").field(d).finish(),
            Opt::Components(c) => f.debug_tuple("Components").field(c).finish(),
            Opt::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub fn with_master() -> Opt {
    Opt::Master
}

pub fn with_advertise_addr(addr: impl Into<String>) -> Opt {
    Opt::AdvertiseAddr(addr.into())
}

pub fn with_client_addr(addr: impl Into<String>) -> Opt {
    Opt::ClientAddr(addr.into())
}

pub fn with_retry_interval(interval: Duration) -> Opt {
    Opt::RetryInterval(interval)
}

pub fn with_components(components: Components) -> Opt {
    Opt::Components(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_options_set_fields() {
        let mut config = NodeConfig::default();
        for opt in [
            with_master(),
            with_advertise_addr("10.0.0.1:7000"),
            with_client_addr("0.0.0.0:3250"),
            with_retry_interval(Duration::from_millis(500)),
        ] {
            opt.apply(&mut config);
        }

        assert!(config.is_master);
        assert_eq!(config.advertise_addr, "10.0.0.1:7000");
        assert_eq!(config.client_addr, "0.0.0.0:3250");
        assert_eq!(config.retry_interval, Duration::from_millis(500));
    }

    #[test]
    fn custom_option_runs_closure() {
        let mut config = NodeConfig::default();
        Opt::custom(|c| c.client_addr = "custom".into()).apply(&mut config);
        assert_eq!(config.client_addr, "custom");
    }

    #[test]
    fn components_option_shares_registry() {
        let components = Components::new();
        let mut config = NodeConfig::default();
        with_components(components.clone()).apply(&mut config);
        assert!(config.components.same_registry(&components));
    }

    #[test]
    fn debug_hides_closure() {
        assert_eq!(format!("{:?}", Opt::custom(|_| {})), "Custom(..)");
        assert_eq!(format!("{:?}", with_client_addr("a")), "ClientAddr(\"a\")");
    }
}
