use std::collections::BTreeMap;
use std::fs;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ppp_db::{FetchError, ServiceStore};
use ppp_reconcile::ServiceRow;
use tokio_util::sync::CancellationToken;

/// Scripted failure returned instead of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailure {
    Prepare,
    Query,
    Scan,
    Iterate,
}

/// [`ServiceStore`] over a fixed map of device id -> rows.
#[derive(Default)]
pub struct MemoryStore {
    rows: BTreeMap<i64, Vec<ServiceRow>>,
    failure: Option<StoreFailure>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, device_id: i64, rows: Vec<ServiceRow>) -> Self {
        self.rows.insert(device_id, rows);
        self
    }

    pub fn failing(mut self, failure: StoreFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceStore for MemoryStore {
    async fn fetch_rows(
        &self,
        cancel: &CancellationToken,
        device_id: i64,
    ) -> Result<Vec<ServiceRow>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if cancel.is_cancelled() {
            return Err(FetchError::query(device_id, ppp_db::Cancelled));
        }

        match self.failure {
            Some(StoreFailure::Prepare) => Err(FetchError::prepare("connection refused")),
            Some(StoreFailure::Query) => Err(FetchError::query(device_id, "table doesn't exist")),
            Some(StoreFailure::Scan) => Err(FetchError::scan("deviceState", "NULL")),
            Some(StoreFailure::Iterate) => Err(FetchError::iterate("connection reset")),
            None => Ok(self.rows.get(&device_id).cloned().unwrap_or_default()),
        }
    }
}

/// Shorthand row constructor; `addr` is dotted-quad text.
///
/// Panics on a malformed address so a fixture typo fails the test.
pub fn row(login: &str, secret: &str, addr: &str, status: i32, option_code: &str) -> ServiceRow {
    let address: Ipv4Addr = addr
        .parse()
        .unwrap_or_else(|e| panic!("fixture address {addr:?}: {e}"));
    ServiceRow::new(login, secret, address, status, option_code)
}

/// Load a JSON array of rows (fixture files).
pub fn load_rows_json(path: &str) -> Result<Vec<ServiceRow>> {
    let s = fs::read_to_string(path).with_context(|| format!("read rows fixture: {path}"))?;
    let rows: Vec<ServiceRow> = serde_json::from_str(&s).context("parse rows fixture json")?;
    Ok(rows)
}
