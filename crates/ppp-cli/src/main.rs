use anyhow::Result;
use clap::{Parser, Subcommand};
use ppp_config::secrets::SecretScope;
use tokio_util::sync::CancellationToken;
use tracing::warn;

mod commands;

#[derive(Parser)]
#[command(name = "pppsync")]
#[command(about = "Rebuild a router's PPP secrets from the service database", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (base -> site -> host)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Erase and rebuild the router's PPP secrets for one or more devices
    Update {
        /// Device id (repeatable). Defaults to update.device_ids from config.
        #[arg(long = "device")]
        devices: Vec<i64>,
    },

    /// Print the commands an update would send, without touching the router
    Render {
        #[arg(long = "device")]
        device: i64,

        /// Print passwords instead of <REDACTED>
        #[arg(long, default_value_t = false)]
        show_secrets: bool,

        /// Emit JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    /// Connectivity + service table probe
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Production injects env
    // vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Update { devices } => {
            let cancel = cancel_on_ctrl_c();
            commands::update::run(&cli.config_paths, &devices, &cancel).await?;
        }

        Commands::Render {
            device,
            show_secrets,
            json,
        } => {
            let cancel = cancel_on_ctrl_c();
            let opts = commands::render::RenderOpts { show_secrets, json };
            commands::render::run(&cli.config_paths, device, opts, &cancel).await?;
        }

        Commands::Db { cmd } => match cmd {
            DbCmd::Status => {
                let loaded = commands::load_config(&cli.config_paths)?;
                let settings = loaded.settings()?;
                let secrets = commands::secrets(&settings, SecretScope::Store)?;
                let pool = commands::connect_pool(&settings, &secrets).await?;
                let s = ppp_db::status(&pool).await?;
                println!("db_ok={} has_service_table={}", s.ok, s.has_service_table);
            }
        },

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = ppp_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Ctrl-C cancels the in-flight store query. A remote command already
/// running is not interrupted.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling store query");
            child.cancel();
        }
    });
    token
}
