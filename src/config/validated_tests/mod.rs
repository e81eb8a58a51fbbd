//! Tests for validated configuration.

use std::collections::HashMap;

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::ValidatedConfig;

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["iphook"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

/// Environment lookup with nothing set
fn no_env(_name: &str) -> Option<String> {
    None
}

/// Environment lookup over fixed variables
fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

/// Validates CLI and TOML without credentials
fn validate(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ValidatedConfig, ConfigError> {
    ValidatedConfig::from_raw(cli, toml, no_env)
}
