//! Network layer for routes, interface addresses and public address resolution.
//!
//! This module provides types and traits for:
//! - Representing routes and interface addresses ([`Route`], [`InterfaceAddress`])
//! - Address families ([`Family`]) and interface identity ([`LinkId`])
//! - Querying the routing table ([`RouteFacility`])
//! - Selecting publishable addresses ([`filter`])
//! - Resolving "the" public address of a family ([`Resolver`])
//! - Platform-specific implementations ([`platform`])

mod address;
mod facility;
pub mod filter;
pub mod platform;
mod resolver;

#[cfg(test)]
mod filter_tests;

pub use address::{AddressScope, Family, InterfaceAddress, LinkId, Prefix, Route};
pub use facility::{FacilityError, RouteFacility};
pub use resolver::{ResolveError, Resolver};
