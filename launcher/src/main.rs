//! `launcher` binary: start the configured MCP fleet and keep it running
//! until interrupted.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "launcher")]
#[command(about = "Supervises the MCP fleet's lifecycle")]
struct Args {
    /// MCP keys to launch; defaults to every key in the registry. Also
    /// accepted as a single comma-separated positional argument (§6.3).
    #[arg(value_delimiter = ',')]
    mcps: Vec<String>,

    /// Where to write the ACTIVE_MCPS manifest the orchestrator reads
    #[arg(long, value_name = "PATH", default_value = "active_mcps.manifest")]
    manifest_path: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let keys = if args.mcps.is_empty() {
        mcp_client::REGISTRY.iter().map(|d| d.key.to_string()).collect()
    } else {
        args.mcps
    };

    launcher::manifest::write_manifest(&args.manifest_path, &keys)?;
    tracing::info!(manifest = %args.manifest_path.display(), mcps = %launcher::manifest::active_mcps_value(&keys), "wrote discovery manifest");
    std::env::set_var(launcher::manifest::ACTIVE_MCPS_VAR, launcher::manifest::active_mcps_value(&keys));

    let fleet = launcher::supervisor::spawn_fleet(&keys)?;
    tracing::info!(mcps = ?fleet.keys(), "mcp fleet started");

    tokio::signal::ctrl_c().await?;
    tracing::info!("received interrupt, shutting down mcp fleet");
    fleet.shutdown().await;
    Ok(())
}
