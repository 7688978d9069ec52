//! Bandwidth tier table.
//!
//! Process-wide, read-only. Built at compile time; nothing mutates or tears
//! it down.

/// Profile assigned when the option code is not in [`BANDWIDTH_TIERS`].
pub const DEFAULT_PROFILE: &str = "vpn_2Mb";

/// Device-option code -> router PPP profile name.
pub const BANDWIDTH_TIERS: [(&str, &str); 16] = [
    ("8", "vpn_1Mb"),
    ("9", "vpn_2Mb"),
    ("10", "vpn_3Mb"),
    ("11", "vpn_1,5Mb"),
    ("12", "vpn_2,5Mb"),
    ("13", "vpn_4Mb"),
    ("14", "vpn_5Mb"),
    ("15", "vpn_6Mb"),
    ("16", "vpn_7Mb"),
    ("17", "vpn_8Mb"),
    ("18", "vpn_9Mb"),
    ("20", "vpn_10Mb"),
    ("25", "vpn_20Mb"),
    ("26", "vpn_12Mb"),
    ("28", "vpn_15Mb"),
    ("30", "vpn_50Mb"),
];

/// Exact-match lookup; no trimming or numeric coercion of the code.
pub fn profile_for_option(code: &str) -> &'static str {
    BANDWIDTH_TIERS
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, profile)| *profile)
        .unwrap_or(DEFAULT_PROFILE)
}
