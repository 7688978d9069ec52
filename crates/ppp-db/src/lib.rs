//! Relational store access for service rows.
//!
//! The store is read-only from this crate's point of view: one parameterized
//! query per device, streamed and decoded into [`ServiceRow`]s.

use anyhow::{Context, Result};
use sqlx::mysql::MySqlPoolOptions;

mod address;
mod error;
mod store;

pub use address::{decode_address, AddressDecodeError};
pub use error::{BoxError, Cancelled, FetchError};
pub use store::{MySqlServiceStore, ServiceStore, SERVICE_QUERY, SERVICE_TABLE};

pub use ppp_reconcile::ServiceRow;
pub use sqlx::mysql::MySqlPool;

/// Env var read by DB-backed tests.
pub const ENV_TEST_DB_URL: &str = "PPPSYNC_TEST_DATABASE_URL";

/// Open a MySQL pool and verify it with a ping.
pub async fn connect(url: &str, max_connections: u32) -> Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect(url)
        .await
        .context("open sql connection failed")?;

    ping(&pool).await.context("mysql ping failure")?;
    Ok(pool)
}

async fn ping(pool: &MySqlPool) -> Result<()> {
    let (one,): (i64,) = sqlx::query_as::<_, (i64,)>("select 1")
        .fetch_one(pool)
        .await?;
    anyhow::ensure!(one == 1, "unexpected ping result {one}");
    Ok(())
}

/// Simple status query (connectivity + service table presence).
pub async fn status(pool: &MySqlPool) -> Result<DbStatus> {
    let ok = ping(pool).await.is_ok();

    let (n,): (i64,) = sqlx::query_as::<_, (i64,)>(
        r#"
        select count(*)
        from information_schema.tables
        where table_schema = database() and table_name = ?
        "#,
    )
    .bind(SERVICE_TABLE)
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok,
        has_service_table: n > 0,
    })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_service_table: bool,
}

/// Pool for DB-backed tests, from [`ENV_TEST_DB_URL`].
pub async fn testkit_db_pool() -> Result<MySqlPool> {
    let url = std::env::var(ENV_TEST_DB_URL)
        .with_context(|| format!("missing env var {ENV_TEST_DB_URL}"))?;
    connect(&url, 2).await
}
