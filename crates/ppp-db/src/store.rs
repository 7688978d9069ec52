use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{Executor, Row, Statement};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::address::decode_address;
use crate::error::{BoxError, Cancelled, FetchError};
use ppp_reconcile::ServiceRow;

pub const SERVICE_TABLE: &str = "inet_serv_14";

pub const SERVICE_QUERY: &str = "SELECT login, password, addressFrom, deviceState, deviceOptions FROM inet_serv_14 WHERE deviceId = ?;";

/// Read seam over the service table.
///
/// Implementations must return rows in store order and must not write.
#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn fetch_rows(
        &self,
        cancel: &CancellationToken,
        device_id: i64,
    ) -> Result<Vec<ServiceRow>, FetchError>;
}

/// [`ServiceStore`] backed by a shared MySQL pool.
#[derive(Clone)]
pub struct MySqlServiceStore {
    pool: MySqlPool,
}

impl MySqlServiceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl ServiceStore for MySqlServiceStore {
    async fn fetch_rows(
        &self,
        cancel: &CancellationToken,
        device_id: i64,
    ) -> Result<Vec<ServiceRow>, FetchError> {
        let mut conn = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::prepare(Cancelled)),
            conn = self.pool.acquire() => conn.map_err(FetchError::prepare)?,
        };

        let stmt = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::prepare(Cancelled)),
            stmt = Executor::prepare(&mut *conn, SERVICE_QUERY) => stmt.map_err(FetchError::prepare)?,
        };

        let mut rows = stmt.query().bind(device_id).fetch(&mut *conn);
        let mut out: Vec<ServiceRow> = Vec::new();
        let mut seen_row = false;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(stream_error(seen_row, device_id, Cancelled)),
                next = rows.try_next() => next,
            };

            match next {
                Ok(Some(row)) => {
                    seen_row = true;
                    out.push(decode_row(&row)?);
                }
                Ok(None) => break,
                Err(e) => return Err(stream_error(seen_row, device_id, e)),
            }
        }

        debug!(device_id, rows = out.len(), "service rows fetched");
        Ok(out)
    }
}

/// A cursor failure is a query failure until the first row has been seen,
/// and an iteration failure after.
fn stream_error(seen_row: bool, device_id: i64, source: impl Into<BoxError>) -> FetchError {
    if seen_row {
        FetchError::iterate(source)
    } else {
        FetchError::query(device_id, source)
    }
}

fn decode_row(row: &MySqlRow) -> Result<ServiceRow, FetchError> {
    let login = row
        .try_get::<String, _>("login")
        .map_err(|e| FetchError::scan("login", e))?;
    let secret = row
        .try_get::<String, _>("password")
        .map_err(|e| FetchError::scan("password", e))?;
    let raw_address = row
        .try_get::<Vec<u8>, _>("addressFrom")
        .map_err(|e| FetchError::scan("addressFrom", e))?;
    let address =
        decode_address(&raw_address).map_err(|e| FetchError::scan("addressFrom", e))?;
    let status = row
        .try_get::<i32, _>("deviceState")
        .map_err(|e| FetchError::scan("deviceState", e))?;
    let option_code = row
        .try_get::<String, _>("deviceOptions")
        .map_err(|e| FetchError::scan("deviceOptions", e))?;

    Ok(ServiceRow {
        login,
        secret,
        address,
        status,
        option_code,
    })
}
