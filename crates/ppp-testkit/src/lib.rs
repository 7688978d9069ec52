//! In-memory stand-ins for the store and the router, for scenario tests.
//!
//! Nothing here talks to MySQL or SSH.

mod channel;
mod store;

pub use channel::{RecordingChannel, RemoteFailure, SessionEvent};
pub use store::{load_rows_json, row, MemoryStore, StoreFailure};
