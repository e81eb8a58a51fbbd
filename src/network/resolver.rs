//! Public address resolution for one address family.
//!
//! [`Resolver::resolve`] finds "the" public address of a family:
//!
//! 1. Without a pinned link, the link carrying the single default route is used.
//!    No default route means the family is unavailable (`Ok(None)`), more than
//!    one is [`ResolveError::AmbiguousRoute`].
//! 2. The link's addresses are filtered through [`CompositeFilter::public`].
//!    Zero left is `Ok(None)`, exactly one is the answer, more than one is
//!    [`ResolveError::AmbiguousAddress`].
//!
//! Ambiguity is reported rather than guessed: publishing the wrong address
//! would corrupt the DNS record downstream.

use std::net::IpAddr;

use thiserror::Error;

use super::filter::{AddressFilter, CompositeFilter};
use super::{FacilityError, Family, LinkId, RouteFacility};

/// Error type for a single resolution attempt.
///
/// None of these are fatal; the poll loop logs them and treats the family
/// as unresolved for the current iteration.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// More than one default route exists for the family.
    #[error("found {count} default routes, expecting 1")]
    AmbiguousRoute {
        /// Number of default routes found.
        count: usize,
    },

    /// More than one address qualifies on the link.
    #[error("found {count} addresses, expecting 1")]
    AmbiguousAddress {
        /// Number of qualifying addresses found.
        count: usize,
    },

    /// The default route does not name an output interface.
    #[error("default route has no output interface")]
    RouteWithoutLink,

    /// The underlying query failed.
    #[error(transparent)]
    Facility(#[from] FacilityError),
}

/// Resolves the public address of an address family.
///
/// # Type Parameters
///
/// * `F` - The [`RouteFacility`] used to query routes and addresses
#[derive(Debug)]
pub struct Resolver<F> {
    facility: F,
    filter: CompositeFilter,
}

impl<F: RouteFacility> Resolver<F> {
    /// Creates a resolver with the public-address selection rule.
    #[must_use]
    pub fn new(facility: F) -> Self {
        Self {
            facility,
            filter: CompositeFilter::public(),
        }
    }

    /// Returns the underlying facility.
    #[must_use]
    pub const fn facility(&self) -> &F {
        &self.facility
    }

    /// Resolves the single public address of `family`.
    ///
    /// `link` pins the interface; when `None` the default-route interface is
    /// rediscovered on every call.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on ambiguity or when a query fails.
    pub fn resolve(
        &self,
        link: Option<LinkId>,
        family: Family,
    ) -> Result<Option<IpAddr>, ResolveError> {
        let link = match link {
            Some(link) => link,
            None => match self.default_link(family)? {
                Some(link) => link,
                None => return Ok(None),
            },
        };

        let candidates = self.facility.addresses(link, family)?;
        let mut selected = self.filter.apply(candidates);
        selected.retain(|a| family.contains(&a.address));

        match selected.len() {
            0 => Ok(None),
            1 => Ok(Some(selected[0].address)),
            count => Err(ResolveError::AmbiguousAddress { count }),
        }
    }

    /// Finds the link carrying the default route of `family`.
    fn default_link(&self, family: Family) -> Result<Option<LinkId>, ResolveError> {
        let routes = self.facility.routes(None, family)?;
        let defaults: Vec<_> = routes.into_iter().filter(|r| r.is_default()).collect();

        match defaults.as_slice() {
            [] => Ok(None),
            [route] => route.link.map(Some).ok_or(ResolveError::RouteWithoutLink),
            _ => Err(ResolveError::AmbiguousRoute {
                count: defaults.len(),
            }),
        }
    }
}
