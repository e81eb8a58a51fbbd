//! Route/address query trait and error types.

use super::{Family, InterfaceAddress, LinkId, Route};
use thiserror::Error;

/// Error type for routing table and address queries.
///
/// Describes what went wrong without dictating recovery strategy.
/// The resolver treats every variant as "family unresolved this iteration".
#[derive(Debug, Error)]
pub enum FacilityError {
    /// No interface with the given name exists.
    #[error("Link not found: {name}")]
    LinkNotFound {
        /// The interface name that was looked up.
        name: String,
    },

    /// Socket-level failure talking to the kernel.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The kernel answered a request with an error.
    #[error("Kernel error: {0}")]
    Kernel(#[source] std::io::Error),

    /// A reply could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Platform without a routing facility implementation.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

/// Trait for querying the routing table and interface addresses.
///
/// # Design
///
/// - The production implementation talks netlink; tests inject scripted mocks
/// - Every call is a fresh query, nothing is cached between calls
/// - Synchronous: each call is a single short dump request
///
/// # Example
///
/// ```ignore
/// use iphook::network::{Family, FacilityError, InterfaceAddress, LinkId, Route, RouteFacility};
///
/// struct StaticFacility;
///
/// impl RouteFacility for StaticFacility {
///     fn link_by_name(&self, name: &str) -> Result<LinkId, FacilityError> {
///         Err(FacilityError::LinkNotFound { name: name.to_string() })
///     }
///
///     fn routes(&self, _link: Option<LinkId>, _family: Family) -> Result<Vec<Route>, FacilityError> {
///         Ok(vec![Route::default_via(LinkId::new(2))])
///     }
///
///     fn addresses(&self, _link: LinkId, _family: Family) -> Result<Vec<InterfaceAddress>, FacilityError> {
///         Ok(vec![InterfaceAddress::global("203.0.113.7".parse().unwrap())])
///     }
/// }
/// ```
pub trait RouteFacility: Send + Sync {
    /// Looks up an interface by name.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::LinkNotFound`] if no interface has that name,
    /// or another [`FacilityError`] if the query itself fails.
    fn link_by_name(&self, name: &str) -> Result<LinkId, FacilityError>;

    /// Lists the main-table routes of `family`.
    ///
    /// When `link` is given, only routes leaving through that interface are returned.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError`] if the routing table cannot be read.
    fn routes(&self, link: Option<LinkId>, family: Family) -> Result<Vec<Route>, FacilityError>;

    /// Lists the addresses of `family` configured on `link`.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError`] if the address list cannot be read.
    fn addresses(
        &self,
        link: LinkId,
        family: Family,
    ) -> Result<Vec<InterfaceAddress>, FacilityError>;
}

impl<T: RouteFacility + ?Sized> RouteFacility for std::sync::Arc<T> {
    fn link_by_name(&self, name: &str) -> Result<LinkId, FacilityError> {
        (**self).link_by_name(name)
    }

    fn routes(&self, link: Option<LinkId>, family: Family) -> Result<Vec<Route>, FacilityError> {
        (**self).routes(link, family)
    }

    fn addresses(
        &self,
        link: LinkId,
        family: Family,
    ) -> Result<Vec<InterfaceAddress>, FacilityError> {
        (**self).addresses(link, family)
    }
}
