//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Update request configuration section
    #[serde(default)]
    pub webhook: WebhookSection,

    /// Monitoring configuration
    #[serde(default)]
    pub monitor: MonitorSection,
}

/// Update request configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Update URL
    pub url: Option<String>,

    /// Query parameter for the IPv4 address
    pub ipv4_param: Option<String>,

    /// Query parameter for the IPv6 address
    pub ipv6_param: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Interface name (empty = follow the default route)
    pub interface: Option<String>,

    /// Polling interval in seconds
    pub interval: Option<u64>,

    /// Interval after a rejected update, in seconds
    pub error_interval: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# iphook configuration file
#
# Command-line flags override values set here.
# Credentials are never stored in this file; set IPHOOK_USER and
# IPHOOK_PASSWORD in the environment to send HTTP Basic authentication.

[webhook]
# Update URL. The address parameters are appended to its query.
# A URL without a host only logs the request it would send.
url = "/nic/update?hostname=test.example.com"

# Query parameter carrying the IPv4 address (empty = never send IPv4)
ipv4_param = "myip"

# Query parameter carrying the IPv6 address (empty = never send IPv6)
ipv6_param = "myipv6"

# HTTP request timeout in seconds (default: 30)
# timeout = 30

[monitor]
# Interface to read addresses from (empty = follow the default route)
# interface = "eth0"

# Polling interval in seconds (default: 5)
interval = 5

# Interval after the endpoint rejected an update, in seconds (default: 300)
error_interval = 300
"#
    .to_string()
}
