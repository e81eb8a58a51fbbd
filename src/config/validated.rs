//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::monitor::Intervals;
use crate::webhook::{Credentials, Endpoint, RequestTemplate};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args, an optional TOML
/// config and an environment lookup. [`ValidatedConfig::load`] does the same
/// with the config file named by `--config` and the process environment.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Pinned interface name; `None` follows the default route
    pub interface: Option<String>,

    /// Update request template, with credentials embedded if configured
    pub template: RequestTemplate,

    /// Basic-auth credentials from the environment
    pub credentials: Option<Credentials>,

    /// Polling interval
    pub interval: Duration,

    /// Interval after a rejected update
    pub error_interval: Duration,

    /// HTTP request timeout
    pub timeout: Duration,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interface = self.interface.as_deref().unwrap_or("auto");
        let auth = self
            .credentials
            .as_ref()
            .map_or("none", |c| c.username.as_str());

        write!(
            f,
            "Config {{ url: {}, interface: {}, ipv4_param: {:?}, ipv6_param: {:?}, \
             interval: {}s, error_interval: {}s, timeout: {}s, auth: {} }}",
            self.template.describe(None, None),
            interface,
            self.template.ipv4_param(),
            self.template.ipv6_param(),
            self.interval.as_secs(),
            self.error_interval.as_secs(),
            self.timeout.as_secs(),
            auth,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments, optional TOML
    /// config and an environment lookup.
    ///
    /// CLI arguments take precedence over TOML config values, which take
    /// precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is neither an absolute URL nor a relative reference
    /// - A duration is zero
    pub fn from_raw<E>(cli: &Cli, toml: Option<&TomlConfig>, env: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let interface = Self::resolve_interface(cli, toml);
        let credentials = resolve_credentials(env);
        let template = Self::build_template(cli, toml, credentials.as_ref())?;

        let interval = resolve_duration(
            field::INTERVAL,
            cli.interval,
            toml.and_then(|t| t.monitor.interval),
            defaults::INTERVAL_SECS,
        )?;
        let error_interval = resolve_duration(
            field::ERROR_INTERVAL,
            cli.error_interval,
            toml.and_then(|t| t.monitor.error_interval),
            defaults::ERROR_INTERVAL_SECS,
        )?;
        let timeout = resolve_duration(
            field::TIMEOUT,
            cli.timeout,
            toml.and_then(|t| t.webhook.timeout),
            defaults::TIMEOUT_SECS,
        )?;

        Ok(Self {
            interface,
            template,
            credentials,
            interval,
            error_interval,
            timeout,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI, optional config file and
    /// the process environment.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref(), |name| std::env::var(name).ok())
    }

    /// Returns the poll loop intervals.
    #[must_use]
    pub const fn intervals(&self) -> Intervals {
        Intervals::new(self.interval, self.error_interval)
    }

    fn resolve_interface(cli: &Cli, toml: Option<&TomlConfig>) -> Option<String> {
        // An explicit empty CLI value overrides a TOML interface
        cli.interface
            .as_deref()
            .or_else(|| toml.and_then(|t| t.monitor.interface.as_deref()))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    fn build_template(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        credentials: Option<&Credentials>,
    ) -> Result<RequestTemplate, ConfigError> {
        let webhook = toml.map(|t| &t.webhook);

        // Priority: CLI explicit > TOML > default
        let url = cli
            .url
            .as_deref()
            .or_else(|| webhook.and_then(|w| w.url.as_deref()))
            .unwrap_or(defaults::URL);

        let ipv4_param = cli
            .ipv4_param
            .as_deref()
            .or_else(|| webhook.and_then(|w| w.ipv4_param.as_deref()))
            .unwrap_or(defaults::IPV4_PARAM);

        let ipv6_param = cli
            .ipv6_param
            .as_deref()
            .or_else(|| webhook.and_then(|w| w.ipv6_param.as_deref()))
            .unwrap_or(defaults::IPV6_PARAM);

        let endpoint = Endpoint::parse(url).map_err(|e| ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let template = RequestTemplate::new(endpoint, ipv4_param, ipv6_param);
        Ok(match credentials {
            Some(credentials) => template.with_credentials(credentials),
            None => template,
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn resolve_credentials<E>(env: E) -> Option<Credentials>
where
    E: Fn(&str) -> Option<String>,
{
    let username = env(defaults::USER_ENV).filter(|u| !u.is_empty())?;
    let password = env(defaults::PASSWORD_ENV).unwrap_or_default();
    Some(Credentials { username, password })
}

fn resolve_duration(
    field: &'static str,
    cli: Option<u64>,
    toml: Option<u64>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let seconds = cli.or(toml).unwrap_or(default);

    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(Duration::from_secs(seconds))
}
