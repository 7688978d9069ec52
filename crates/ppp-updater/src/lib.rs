//! ppp-updater
//!
//! Fetch service rows for a device, normalize them, then fully replace the
//! router's PPP secrets in two remote phases: erase everything, rebuild the
//! active set.
//!
//! Failure between the phases leaves the router with no secrets. Nothing here
//! retries or rolls back; the next successful update restores the state.

mod error;
mod fetcher;
mod updater;

pub use error::{ErrorKind, Phase, UpdateError};
pub use fetcher::fetch_records;
pub use updater::{Update, UpdateReport, Updater};
