//! `pppsync update`: full replace of the router's PPP secrets.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ppp_config::secrets::SecretScope;
use ppp_db::MySqlServiceStore;
use ppp_updater::{Update, Updater};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{connect_pool, connect_router, load_config, secrets};

/// Devices from the command line win; otherwise `update.device_ids`.
pub fn resolve_devices(flags: &[i64], configured: &[i64]) -> Result<Vec<i64>> {
    let devices = if flags.is_empty() { configured } else { flags };
    if devices.is_empty() {
        bail!("no device ids: pass --device <ID> or set update.device_ids in config");
    }
    Ok(devices.to_vec())
}

pub async fn run(config_paths: &[String], flags: &[i64], cancel: &CancellationToken) -> Result<()> {
    let loaded = load_config(config_paths)?;
    let settings = loaded.settings()?;
    let devices = resolve_devices(flags, &settings.update.device_ids)?;

    let secrets = secrets(&settings, SecretScope::Full)?;
    let password = secrets
        .router_password
        .clone()
        .context("router password not resolved")?;

    info!(config_hash = %loaded.config_hash, devices = ?devices, "starting update");

    let pool = connect_pool(&settings, &secrets).await?;
    let channel = connect_router(&settings, password).await?;
    let updater = Updater::new(Arc::new(MySqlServiceStore::new(pool)), Arc::new(channel));

    // Sequential; the first failure stops the run.
    for device_id in devices {
        let report = updater
            .update(cancel, device_id)
            .await
            .with_context(|| format!("upload failed for device {device_id}"))?;
        println!(
            "updated=true device_id={} fetched={} applied={}",
            report.device_id, report.fetched, report.applied
        );
    }

    Ok(())
}
