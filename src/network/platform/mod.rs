//! Platform-specific routing facility implementations.
//!
//! # Platform Support
//!
//! - **Linux**: rtnetlink dumps via `netlink-sys` and `netlink-packet-route`.
//! - **Elsewhere**: [`UnsupportedFacility`], which fails every query so the
//!   poll loop keeps running and logs the reason.

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::NetlinkFacility;

// Re-export platform-specific facility as PlatformFacility for convenience
#[cfg(target_os = "linux")]
pub use linux::NetlinkFacility as PlatformFacility;

#[cfg(not(target_os = "linux"))]
pub use self::UnsupportedFacility as PlatformFacility;

use super::{FacilityError, Family, InterfaceAddress, LinkId, Route, RouteFacility};

/// Facility for platforms without a routing table implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedFacility;

impl UnsupportedFacility {
    fn error() -> FacilityError {
        FacilityError::Platform {
            message: format!(
                "routing queries are not supported on {}",
                std::env::consts::OS
            ),
        }
    }
}

impl RouteFacility for UnsupportedFacility {
    fn link_by_name(&self, _name: &str) -> Result<LinkId, FacilityError> {
        Err(Self::error())
    }

    fn routes(&self, _link: Option<LinkId>, _family: Family) -> Result<Vec<Route>, FacilityError> {
        Err(Self::error())
    }

    fn addresses(
        &self,
        _link: LinkId,
        _family: Family,
    ) -> Result<Vec<InterfaceAddress>, FacilityError> {
        Err(Self::error())
    }
}
