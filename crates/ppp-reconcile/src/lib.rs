//! ppp-reconcile
//!
//! Data model and command synthesis for PPP secret reconciliation.
//!
//! Architectural decisions:
//! - The router's secret store is always fully replaced (erase, then rebuild)
//! - Only records with the active status code are rebuilt
//! - Rebuilt entries are created disabled; activation happens out of band
//! - Unknown bandwidth option codes fall back to the default profile
//!
//! Deterministic, pure logic. No IO. No database or router calls.

mod commands;
mod plan;
mod tiers;
mod types;

pub use commands::{
    add_directive, rebuild_payload, redacted_rebuild_payload, ERASE_ALL_DIRECTIVE,
    LOCAL_ADDRESS_SENTINEL, REDACTED_SECRET,
};
pub use plan::UpdatePlan;
pub use tiers::{profile_for_option, BANDWIDTH_TIERS, DEFAULT_PROFILE};
pub use types::*;
