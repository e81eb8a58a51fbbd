//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// iphook: report the public addresses of this host to a dynamic DNS endpoint
///
/// Watches the global addresses on the default-route interface (or a pinned
/// interface) and sends an HTTP GET to the update URL whenever they change.
/// Credentials are read from `IPHOOK_USER` and `IPHOOK_PASSWORD`.
#[derive(Debug, Parser)]
#[command(name = "iphook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Interface to read addresses from (empty = follow the default route)
    #[arg(long)]
    pub interface: Option<String>,

    /// Polling interval in seconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// Interval in seconds after the endpoint rejected an update
    #[arg(long = "error-interval")]
    pub error_interval: Option<u64>,

    /// Update URL; address parameters are appended to its query
    #[arg(long)]
    pub url: Option<String>,

    /// Query parameter carrying the IPv4 address (empty = never send IPv4)
    #[arg(long = "ipv4-param")]
    pub ipv4_param: Option<String>,

    /// Query parameter carrying the IPv6 address (empty = never send IPv6)
    #[arg(long = "ipv6-param")]
    pub ipv6_param: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for iphook
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "iphook.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
