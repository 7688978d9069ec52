use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::tiers::profile_for_option;

/// Status code the store uses for accounts that must exist on the router.
pub const ACTIVE_STATUS: i32 = 1;

/// One service row exactly as the store returned it.
///
/// The address has already been decoded to IPv4 by the store adapter; every
/// other field is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRow {
    pub login: String,
    pub secret: String,
    pub address: Ipv4Addr,
    pub status: i32,
    /// Raw device-option code, looked up in [`crate::BANDWIDTH_TIERS`].
    pub option_code: String,
}

impl ServiceRow {
    pub fn new(
        login: &str,
        secret: &str,
        address: Ipv4Addr,
        status: i32,
        option_code: &str,
    ) -> Self {
        Self {
            login: login.to_string(),
            secret: secret.to_string(),
            address,
            status,
            option_code: option_code.to_string(),
        }
    }
}

/// A normalized PPP account, ready for command synthesis.
///
/// Lives for one update call only: built from a fetched row, consumed by
/// the plan, then dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub login: String,
    /// Opaque credential. Never rewritten.
    pub secret: String,
    pub remote_address: Ipv4Addr,
    /// Bandwidth profile name; never empty (mapped or default).
    pub bandwidth_tier: String,
    pub status: i32,
}

impl ServiceRecord {
    /// Normalize a store row: default profile first, overridden when the
    /// option code is a known tier.
    pub fn from_row(row: ServiceRow) -> Self {
        let bandwidth_tier = profile_for_option(&row.option_code).to_string();
        Self {
            login: row.login,
            secret: row.secret,
            remote_address: row.address,
            bandwidth_tier,
            status: row.status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

impl std::fmt::Debug for ServiceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRecord")
            .field("login", &self.login)
            .field("secret", &"<REDACTED>")
            .field("remote_address", &self.remote_address)
            .field("bandwidth_tier", &self.bandwidth_tier)
            .field("status", &self.status)
            .finish()
    }
}
