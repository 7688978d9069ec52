//! Command handler modules for pppsync.
//!
//! Shared bootstrap (config, store, router) lives here; command-specific
//! logic lives in the submodules.

pub mod render;
pub mod update;

use std::time::Duration;

use anyhow::{Context, Result};
use ppp_config::secrets::{resolve_secrets, ResolvedSecrets, SecretScope};
use ppp_config::{LoadedConfig, Settings};
use ppp_db::MySqlPool;
use ppp_remote::{SshChannel, SshTarget};
use tracing::info;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load layered config, or defaults when no paths were given.
pub fn load_config(paths: &[String]) -> Result<LoadedConfig> {
    if paths.is_empty() {
        return Ok(LoadedConfig::empty());
    }
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    ppp_config::load_layered_yaml(&path_refs)
}

/// Resolve credentials for `scope` once; everything downstream borrows them.
pub fn secrets(settings: &Settings, scope: SecretScope) -> Result<ResolvedSecrets> {
    resolve_secrets(settings, scope)
}

pub async fn connect_pool(settings: &Settings, secrets: &ResolvedSecrets) -> Result<MySqlPool> {
    ppp_db::connect(&secrets.database_url, settings.store.max_connections).await
}

/// Dial and authenticate the router off the async workers.
pub async fn connect_router(settings: &Settings, password: String) -> Result<SshChannel> {
    let r = &settings.router;
    let target = SshTarget {
        address: r.address.clone(),
        login: r.login.clone(),
        password,
        connect_timeout: Duration::from_secs(r.connect_timeout_secs.max(1)),
        command_timeout: (r.command_timeout_secs > 0)
            .then(|| Duration::from_secs(r.command_timeout_secs)),
        host_key_sha256: r.host_key_sha256.clone(),
    };

    let address = target.address.clone();
    let channel = tokio::task::spawn_blocking(move || SshChannel::connect(&target))
        .await
        .context("ssh connect task failed")?
        .with_context(|| format!("open ssh client: {address}"))?;

    info!(router = %address, "router connected");
    Ok(channel)
}
