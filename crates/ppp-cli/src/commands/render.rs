//! `pppsync render`: dry run. Reads the store, never touches the router.

use std::sync::Arc;

use anyhow::{Context, Result};
use ppp_config::secrets::SecretScope;
use ppp_db::{MySqlServiceStore, ServiceStore};
use ppp_reconcile::UpdatePlan;
use ppp_remote::{RemoteChannel, RemoteError, RemoteSession, SessionOp};
use ppp_updater::Updater;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::{connect_pool, load_config, secrets};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOpts {
    pub show_secrets: bool,
    pub json: bool,
}

/// Channel handed to the updater for dry runs; any session attempt is a bug.
struct NoRouter;

impl RemoteChannel for NoRouter {
    fn peer(&self) -> String {
        "dry-run".to_string()
    }

    fn open_session(&self) -> Result<Box<dyn RemoteSession>, RemoteError> {
        Err(RemoteError::session(SessionOp::Open, "dry run has no router"))
    }
}

#[derive(Serialize)]
struct RenderedPlan<'a> {
    device_id: i64,
    fetched: usize,
    active: usize,
    erase: &'a str,
    rebuild: String,
}

pub async fn run(
    config_paths: &[String],
    device_id: i64,
    opts: RenderOpts,
    cancel: &CancellationToken,
) -> Result<()> {
    let loaded = load_config(config_paths)?;
    let settings = loaded.settings()?;
    let secrets = secrets(&settings, SecretScope::Store)?;
    let pool = connect_pool(&settings, &secrets).await?;

    let store: Arc<dyn ServiceStore> = Arc::new(MySqlServiceStore::new(pool));
    let plan = Updater::new(store, Arc::new(NoRouter))
        .plan(cancel, device_id)
        .await
        .with_context(|| format!("render failed for device {device_id}"))?;

    print!("{}", render(device_id, &plan, opts)?);
    Ok(())
}

pub fn render(device_id: i64, plan: &UpdatePlan, opts: RenderOpts) -> Result<String> {
    let rebuild = if opts.show_secrets {
        plan.rebuild.clone()
    } else {
        plan.redacted_payload().to_string()
    };

    if opts.json {
        let view = RenderedPlan {
            device_id,
            fetched: plan.fetched,
            active: plan.active,
            erase: plan.erase,
            rebuild,
        };
        let mut s = serde_json::to_string_pretty(&view).context("render json")?;
        s.push('\n');
        return Ok(s);
    }

    let mut out = format!(
        "# device_id={} fetched={} active={}\n",
        device_id, plan.fetched, plan.active
    );
    out.push_str(plan.erase);
    out.push('\n');
    out.push_str(&rebuild);
    Ok(out)
}
