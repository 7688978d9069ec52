use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use ppp_db::ServiceStore;
use ppp_reconcile::UpdatePlan;
use ppp_remote::{RemoteChannel, RemoteError, SessionGuard};

use crate::error::{Phase, UpdateError};
use crate::fetcher::fetch_records;

/// Caller-facing reconciliation operation.
#[async_trait]
pub trait Update: Send + Sync {
    async fn update(
        &self,
        cancel: &CancellationToken,
        device_id: i64,
    ) -> Result<UpdateReport, UpdateError>;
}

/// What a successful update did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub device_id: i64,
    /// Rows returned by the store.
    pub fetched: usize,
    /// Secrets written back (active rows).
    pub applied: usize,
}

/// Reconciles one router's PPP secrets against the store.
///
/// Holds shared handles only; concurrent calls are not serialized here.
#[derive(Clone)]
pub struct Updater {
    store: Arc<dyn ServiceStore>,
    channel: Arc<dyn RemoteChannel>,
}

impl Updater {
    pub fn new(store: Arc<dyn ServiceStore>, channel: Arc<dyn RemoteChannel>) -> Self {
        Self { store, channel }
    }

    /// Fetch and synthesize without touching the router.
    pub async fn plan(
        &self,
        cancel: &CancellationToken,
        device_id: i64,
    ) -> Result<UpdatePlan, UpdateError> {
        let records = fetch_records(self.store.as_ref(), cancel, device_id).await?;
        Ok(UpdatePlan::from_records(&records))
    }

    async fn run(
        &self,
        cancel: &CancellationToken,
        device_id: i64,
    ) -> Result<UpdateReport, UpdateError> {
        let plan = self.plan(cancel, device_id).await?;
        debug!(device_id, fetched = plan.fetched, active = plan.active, "update planned");

        self.exec(Phase::Erase, plan.erase)?;
        debug!(device_id, peer = %self.channel.peer(), "previous secrets erased");

        self.exec(Phase::Rebuild, &plan.rebuild)?;
        info!(
            device_id,
            fetched = plan.fetched,
            applied = plan.active,
            "ppp secrets rebuilt"
        );

        Ok(UpdateReport {
            device_id,
            fetched: plan.fetched,
            applied: plan.active,
        })
    }

    /// One phase = one session: open, run, close. The guard releases the
    /// session on every early exit.
    fn exec(&self, phase: Phase, command: &str) -> Result<(), UpdateError> {
        let channel = self.channel.as_ref();
        blocking(|| -> Result<(), RemoteError> {
            let mut session = SessionGuard::open(channel)?;
            session.run(command)?;
            session.close()
        })
        .map_err(|e| UpdateError::remote(phase, e))
    }
}

#[async_trait]
impl Update for Updater {
    async fn update(
        &self,
        cancel: &CancellationToken,
        device_id: i64,
    ) -> Result<UpdateReport, UpdateError> {
        self.run(cancel, device_id).await
    }
}

/// Run blocking remote I/O without starving a multi-threaded runtime.
/// On a current-thread runtime (or outside tokio) the call runs inline.
fn blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}
