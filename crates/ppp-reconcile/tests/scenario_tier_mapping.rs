//! Scenario: bandwidth tier mapping
//!
//! # Invariants under test
//!
//! 1. Every code in the tier table maps to exactly its profile.
//! 2. Codes absent from the table map to the default profile.
//! 3. Every normalized record carries a non-empty tier.
//!
//! Pure in-process; no DB or router required.

use std::net::Ipv4Addr;

use ppp_reconcile::{
    profile_for_option, ServiceRecord, ServiceRow, ACTIVE_STATUS, BANDWIDTH_TIERS,
    DEFAULT_PROFILE,
};

fn row_with_code(code: &str) -> ServiceRow {
    ServiceRow::new("u", "s", Ipv4Addr::new(10, 2, 0, 1), ACTIVE_STATUS, code)
}

#[test]
fn table_has_sixteen_entries() {
    assert_eq!(BANDWIDTH_TIERS.len(), 16);
    assert_eq!(DEFAULT_PROFILE, "vpn_2Mb");
}

#[test]
fn every_known_code_maps_to_its_profile() {
    for (code, profile) in BANDWIDTH_TIERS {
        assert_eq!(profile_for_option(code), profile, "code {code}");
        let rec = ServiceRecord::from_row(row_with_code(code));
        assert_eq!(rec.bandwidth_tier, profile, "code {code}");
    }
}

#[test]
fn unknown_codes_map_to_default() {
    for code in ["99", "0", "1", "19", "vpn_10Mb", "", "20 "] {
        let rec = ServiceRecord::from_row(row_with_code(code));
        assert_eq!(rec.bandwidth_tier, DEFAULT_PROFILE, "code {code:?}");
    }
}

#[test]
fn normalized_tier_is_never_empty() {
    let codes: Vec<String> = (0..40).map(|n| n.to_string()).collect();
    for code in &codes {
        let rec = ServiceRecord::from_row(row_with_code(code));
        assert!(!rec.bandwidth_tier.is_empty());
    }
}
