use ppp_db::{FetchError, ServiceStore};
use ppp_reconcile::ServiceRecord;
use tokio_util::sync::CancellationToken;

/// Fetch and normalize every service record for `device_id`, in store order.
///
/// Inactive records are kept; filtering happens during synthesis.
pub async fn fetch_records(
    store: &dyn ServiceStore,
    cancel: &CancellationToken,
    device_id: i64,
) -> Result<Vec<ServiceRecord>, FetchError> {
    let rows = store.fetch_rows(cancel, device_id).await?;
    Ok(rows.into_iter().map(ServiceRecord::from_row).collect())
}
