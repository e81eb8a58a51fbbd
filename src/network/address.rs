//! Core network types for routes and interface addresses.

use std::fmt;
use std::net::IpAddr;

/// Address family to resolve.
///
/// Each poll iteration resolves both families independently, IPv4 first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// IPv4 addresses.
    V4,
    /// IPv6 addresses.
    V6,
}

impl Family {
    /// Both families in resolution order.
    pub const ALL: [Self; 2] = [Self::V4, Self::V6];

    /// Returns true if the address belongs to this family.
    #[must_use]
    pub const fn contains(self, address: &IpAddr) -> bool {
        match self {
            Self::V4 => address.is_ipv4(),
            Self::V6 => address.is_ipv6(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "ipv4"),
            Self::V6 => write!(f, "ipv6"),
        }
    }
}

/// Opaque identifier of a network interface (the kernel interface index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(u32);

impl LinkId {
    /// Wraps a kernel interface index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the kernel interface index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A destination prefix such as `192.0.2.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    /// Network address.
    pub address: IpAddr,
    /// Prefix length in bits.
    pub length: u8,
}

impl Prefix {
    /// Creates a prefix.
    #[must_use]
    pub const fn new(address: IpAddr, length: u8) -> Self {
        Self { address, length }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.length)
    }
}

/// A routing table entry.
///
/// A route without a destination prefix is a default route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Output interface, if the kernel reported one.
    pub link: Option<LinkId>,
    /// Destination prefix; `None` for the default route.
    pub destination: Option<Prefix>,
}

impl Route {
    /// Creates a default route through `link`.
    #[must_use]
    pub const fn default_via(link: LinkId) -> Self {
        Self {
            link: Some(link),
            destination: None,
        }
    }

    /// Creates a route to `destination` through `link`.
    #[must_use]
    pub const fn to(destination: Prefix, link: LinkId) -> Self {
        Self {
            link: Some(link),
            destination: Some(destination),
        }
    }

    /// Returns true if this is a default route.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.destination.is_none()
    }
}

/// Scope of an interface address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressScope {
    /// Routable beyond this host and link (`RT_SCOPE_UNIVERSE`).
    Global,
    /// Site-local.
    Site,
    /// Valid only on the attached link.
    Link,
    /// Valid only on this host.
    Host,
    /// Unknown scope, preserving the raw value for debugging.
    Other(u8),
}

/// An address configured on an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    /// The address value.
    pub address: IpAddr,
    /// Address scope.
    pub scope: AddressScope,
    /// Set for short-lived addresses such as IPv6 privacy extensions.
    pub temporary: bool,
}

impl InterfaceAddress {
    /// Creates a permanent, global-scope address.
    #[must_use]
    pub const fn global(address: IpAddr) -> Self {
        Self {
            address,
            scope: AddressScope::Global,
            temporary: false,
        }
    }

    /// Sets the scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: AddressScope) -> Self {
        self.scope = scope;
        self
    }

    /// Marks the address as temporary.
    #[must_use]
    pub const fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// Returns true if the address lies in a private range.
    ///
    /// IPv4: `10/8`, `172.16/12`, `192.168/16`. IPv6: unique local `fc00::/7`.
    #[must_use]
    pub fn is_private(&self) -> bool {
        match self.address {
            IpAddr::V4(v4) => v4.is_private(),
            IpAddr::V6(v6) => v6.is_unique_local(),
        }
    }
}

impl fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        if self.temporary {
            write!(f, " (temporary)")?;
        }
        Ok(())
    }
}
