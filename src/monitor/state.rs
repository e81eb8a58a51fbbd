//! Address pairs and change detection.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// One address per family, either of which may be absent.
///
/// Used both for the addresses resolved in an iteration and for the
/// submitted state (the last pair the endpoint acknowledged).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AddressPair {
    /// The IPv4 address, if resolved.
    pub ipv4: Option<Ipv4Addr>,
    /// The IPv6 address, if resolved.
    pub ipv6: Option<Ipv6Addr>,
}

impl AddressPair {
    /// Creates a pair.
    #[must_use]
    pub const fn new(ipv4: Option<Ipv4Addr>, ipv6: Option<Ipv6Addr>) -> Self {
        Self { ipv4, ipv6 }
    }

    /// Returns true if neither family has an address.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ipv4.is_none() && self.ipv6.is_none()
    }
}

impl fmt::Display for AddressPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ipv4=")?;
        match self.ipv4 {
            Some(v4) => write!(f, "{v4}")?,
            None => write!(f, "-")?,
        }
        write!(f, " ipv6=")?;
        match self.ipv6 {
            Some(v6) => write!(f, "{v6}"),
            None => write!(f, "-"),
        }
    }
}

/// Decides whether `resolved` must be reported.
///
/// Nothing resolved is never reported, even when the submitted pair is
/// non-empty: a failed lookup is not evidence that the addresses went away.
/// Otherwise any per-family difference from `submitted` is reported.
#[must_use]
pub fn should_notify(resolved: &AddressPair, submitted: &AddressPair) -> bool {
    !resolved.is_empty() && resolved != submitted
}
