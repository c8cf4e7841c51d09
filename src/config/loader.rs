//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::config::options::Opt;
use crate::config::schema::FileConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load a configuration file.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

impl FileConfig {
    /// Translate the file into mutators, in field order.
    ///
    /// Only the fields present in the file produce an option. `is_master = false`
    /// yields nothing, since the master flag can only be raised.
    pub fn to_options(&self) -> Vec<Opt> {
        let node = &self.node;
        let mut opts = Vec::new();

        if node.is_master == Some(true) {
            opts.push(Opt::Master);
        }
        if let Some(addr) = &node.advertise_addr {
            opts.push(Opt::AdvertiseAddr(addr.clone()));
        }
        if let Some(addr) = &node.client_addr {
            opts.push(Opt::ClientAddr(addr.clone()));
        }
        if let Some(ms) = node.retry_interval_ms {
            opts.push(Opt::RetryInterval(Duration::from_millis(ms)));
        }
        opts
    }
}

/// Combine file options with command-line options.
///
/// File options come first, so any field also given on the command line is
/// overridden by it.
pub fn merge(file: Option<&FileConfig>, cli: Vec<Opt>) -> Vec<Opt> {
    let mut opts = file.map(FileConfig::to_options).unwrap_or_default();
    opts.extend(cli);
    opts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::{with_client_addr, with_master};
    use crate::config::resolver::resolve;
    use std::io::Write;

    #[test]
    fn parses_node_table() {
        let file = parse_config(
            r#"
            [node]
            is_master = true
            advertise_addr = "10.0.0.1:7000"
            retry_interval_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(file.node.is_master, Some(true));
        assert_eq!(file.node.advertise_addr.as_deref(), Some("10.0.0.1:7000"));
        assert_eq!(file.node.client_addr, None);

        let resolved = resolve("0.0.0.0:9000", &file.to_options());
        assert!(resolved.config.is_master);
        assert_eq!(resolved.config.retry_interval, Duration::from_millis(1500));
        assert_eq!(resolved.config.client_addr, "");
    }

    #[test]
    fn rejects_unknown_field() {
        let err = parse_config("[node]\nmaster = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[node]\nclient_addr = \"127.0.0.1:3250\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.to_options().len(), 1);
        assert_eq!(config.node.client_addr.as_deref(), Some("127.0.0.1:3250"));
    }

    #[test]
    fn false_master_produces_no_option() {
        let file = parse_config("[node]\nis_master = false\n").unwrap();
        assert!(file.to_options().is_empty());
    }

    #[test]
    fn command_line_overrides_file() {
        let file = parse_config("[node]\nclient_addr = \"F\"\nretry_interval_ms = 900\n").unwrap();

        let opts = merge(Some(&file), vec![with_client_addr("C")]);
        let config = resolve("127.0.0.1:3250", &opts).config;

        assert_eq!(config.client_addr, "C");
        assert_eq!(config.retry_interval, Duration::from_millis(900));
    }

    #[test]
    fn merge_without_file_keeps_command_line() {
        let opts = merge(None, vec![with_master()]);
        assert_eq!(opts.len(), 1);
        assert!(resolve("127.0.0.1:3250", &opts).config.is_master);
    }
}
