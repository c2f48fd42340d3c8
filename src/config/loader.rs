//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::validate_config;
use crate::config::ConfigError;

/// Values that take precedence over the file, e.g. command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub upstream_address: Option<String>,
    pub decision_url: Option<String>,
    /// Only ever switches timing on; the file value stands when unset.
    pub enable_timing: bool,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut ProxyConfig) {
        if let Some(bind) = self.bind_address {
            config.listener.bind_address = bind;
        }
        if let Some(upstream) = self.upstream_address {
            config.upstream.address = upstream;
        }
        if let Some(url) = self.decision_url {
            config.middleware.url_header_request = url;
        }
        if self.enable_timing {
            config.middleware.enable_timing = true;
        }
    }
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    let config: ProxyConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    load_with_overrides(Some(path), ConfigOverrides::default())
}

/// Load the optional file, apply `overrides`, then validate the result once.
///
/// The file alone may be incomplete (e.g. no decision endpoint) as long as
/// the overrides fill the gap.
pub fn load_with_overrides(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => ProxyConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
