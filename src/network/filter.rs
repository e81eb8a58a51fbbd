//! Address filtering for public address selection.
//!
//! # Design
//!
//! - **Pure Matchers**: [`GlobalScopeFilter`], [`PermanentFilter`] and
//!   [`PublicFilter`] each answer one question about an address.
//! - **Composition**: [`CompositeFilter`] combines matchers with AND logic.
//!   [`CompositeFilter::public`] is the selection rule used by the resolver.
//!
//! Filtering is idempotent: applying a filter to its own output yields the same set.

use super::{AddressScope, InterfaceAddress};

/// Trait for filtering interface addresses.
///
/// # Thread Safety
///
/// Filters must be `Send + Sync` so a resolver holding one stays shareable.
pub trait AddressFilter: Send + Sync {
    /// Returns `true` if the address should be kept.
    fn matches(&self, address: &InterfaceAddress) -> bool;

    /// Keeps the matching addresses, preserving order.
    fn apply(&self, addresses: Vec<InterfaceAddress>) -> Vec<InterfaceAddress> {
        addresses.into_iter().filter(|a| self.matches(a)).collect()
    }
}

/// Keeps only global-scope addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalScopeFilter;

impl AddressFilter for GlobalScopeFilter {
    fn matches(&self, address: &InterfaceAddress) -> bool {
        address.scope == AddressScope::Global
    }
}

/// Drops temporary addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermanentFilter;

impl AddressFilter for PermanentFilter {
    fn matches(&self, address: &InterfaceAddress) -> bool {
        !address.temporary
    }
}

/// Drops addresses in private ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicFilter;

impl AddressFilter for PublicFilter {
    fn matches(&self, address: &InterfaceAddress) -> bool {
        !address.is_private()
    }
}

/// Combines filters with AND logic.
///
/// An empty composite matches every address.
#[derive(Default)]
pub struct CompositeFilter {
    filters: Vec<Box<dyn AddressFilter>>,
}

impl CompositeFilter {
    /// Creates an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selection rule for a publishable address:
    /// global scope, not temporary, not private.
    #[must_use]
    pub fn public() -> Self {
        Self::new()
            .with(GlobalScopeFilter)
            .with(PermanentFilter)
            .with(PublicFilter)
    }

    /// Adds a filter.
    #[must_use]
    pub fn with<F: AddressFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Returns the number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if no filters are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl std::fmt::Debug for CompositeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeFilter")
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl AddressFilter for CompositeFilter {
    fn matches(&self, address: &InterfaceAddress) -> bool {
        self.filters.iter().all(|f| f.matches(address))
    }
}
