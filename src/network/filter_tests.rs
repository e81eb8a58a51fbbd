//! Tests for address filters.

use super::filter::*;
use super::{AddressScope, InterfaceAddress};

fn global(s: &str) -> InterfaceAddress {
    InterfaceAddress::global(s.parse().unwrap())
}

mod matchers {
    use super::*;

    #[test]
    fn global_scope_keeps_only_global() {
        assert!(GlobalScopeFilter.matches(&global("203.0.113.1")));
        assert!(!GlobalScopeFilter.matches(&global("fe80::1").with_scope(AddressScope::Link)));
        assert!(!GlobalScopeFilter.matches(&global("127.0.0.1").with_scope(AddressScope::Host)));
        assert!(!GlobalScopeFilter.matches(&global("fec0::1").with_scope(AddressScope::Site)));
        assert!(!GlobalScopeFilter.matches(&global("203.0.113.1").with_scope(AddressScope::Other(7))));
    }

    #[test]
    fn permanent_drops_temporary() {
        assert!(PermanentFilter.matches(&global("2001:db8::1")));
        assert!(!PermanentFilter.matches(&global("2001:db8::1").temporary()));
    }

    #[test]
    fn public_drops_private() {
        assert!(PublicFilter.matches(&global("198.51.100.4")));
        assert!(!PublicFilter.matches(&global("192.168.0.4")));
        assert!(!PublicFilter.matches(&global("fd12::4")));
    }
}

mod composite {
    use super::*;

    #[test]
    fn empty_matches_everything() {
        let filter = CompositeFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&global("10.0.0.1").temporary()));
    }

    #[test]
    fn public_rule_has_three_filters() {
        let filter = CompositeFilter::public();
        assert_eq!(filter.len(), 3);
        assert!(!filter.is_empty());
    }

    #[test]
    fn public_rule_requires_every_condition() {
        let filter = CompositeFilter::public();

        assert!(filter.matches(&global("2001:db8::10")));
        assert!(!filter.matches(&global("2001:db8::10").temporary()));
        assert!(!filter.matches(&global("fe80::10").with_scope(AddressScope::Link)));
        assert!(!filter.matches(&global("fd00::10")));
    }

    #[test]
    fn apply_preserves_order() {
        let filter = CompositeFilter::public();
        let kept = filter.apply(vec![
            global("203.0.113.2"),
            global("10.0.0.2"),
            global("198.51.100.2"),
        ]);

        assert_eq!(kept, vec![global("203.0.113.2"), global("198.51.100.2")]);
    }

    #[test]
    fn apply_is_idempotent() {
        let filter = CompositeFilter::public();
        let input = vec![
            global("203.0.113.2"),
            global("2001:db8::2").temporary(),
            global("fe80::2").with_scope(AddressScope::Link),
            global("172.20.0.2"),
            global("2001:db8::3"),
        ];

        let once = filter.apply(input);
        let twice = filter.apply(once.clone());

        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn debug_shows_filter_count() {
        let debug = format!("{:?}", CompositeFilter::public());
        assert!(debug.contains("CompositeFilter"));
        assert!(debug.contains('3'));
    }
}
