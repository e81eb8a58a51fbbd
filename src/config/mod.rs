//! Configuration layer for iphook.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Every option has a default, so iphook starts without any configuration.
//! The default URL has no host: requests are logged but never sent.
//!
//! An explicitly empty value is a value: `--ipv6-param ""` disables IPv6
//! reporting even if the config file names a parameter, and
//! `--interface ""` follows the default route even if the config file
//! pins an interface.
//!
//! # Credentials
//!
//! Basic-auth credentials are read only from the environment
//! (`IPHOOK_USER`, `IPHOOK_PASSWORD`) and are embedded into the URL
//! userinfo. They are used only when `IPHOOK_USER` is non-empty.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
