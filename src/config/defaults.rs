//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default update URL.
///
/// Has no host, so requests are only logged until a real endpoint is set.
pub const URL: &str = "/nic/update?hostname=test.example.com";

/// Default query parameter for the IPv4 address.
pub const IPV4_PARAM: &str = "myip";

/// Default query parameter for the IPv6 address.
pub const IPV6_PARAM: &str = "myipv6";

/// Default polling interval in seconds.
pub const INTERVAL_SECS: u64 = 5;

/// Default interval after a rejected update, in seconds.
pub const ERROR_INTERVAL_SECS: u64 = 300;

/// Default HTTP request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the Basic-auth user name.
pub const USER_ENV: &str = "IPHOOK_USER";

/// Environment variable holding the Basic-auth password.
pub const PASSWORD_ENV: &str = "IPHOOK_PASSWORD";

/// Default polling interval as Duration.
#[must_use]
pub const fn interval() -> Duration {
    Duration::from_secs(INTERVAL_SECS)
}

/// Default error interval as Duration.
#[must_use]
pub const fn error_interval() -> Duration {
    Duration::from_secs(ERROR_INTERVAL_SECS)
}

/// Default request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}
