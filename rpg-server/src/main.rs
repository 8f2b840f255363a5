//! `rpg-server` binary: bind the game TCP listener, load or generate the
//! named world, and run until interrupted.

use std::path::PathBuf;

use clap::Parser;
use rpg_domain::{Faction, PointOfInterest, WorldState};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_ADDR: &str = "127.0.0.1:9400";

#[derive(Parser, Debug)]
#[command(name = "rpg-server")]
#[command(about = "Authoritative RPG game server")]
struct Args {
    /// Address to bind the game socket on
    #[arg(long, value_name = "HOST:PORT", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Directory holding `characters/` and `worlds/` save data
    #[arg(long, value_name = "DIR", default_value = "saves")]
    data_dir: PathBuf,

    /// World to load or generate on startup
    #[arg(long, value_name = "NAME", default_value = "default")]
    world_name: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .try_init();
}

/// A minimal placeholder world used only when neither a state file nor a
/// template exists yet for `world_name`. World generation content is out of
/// scope; this keeps the server runnable against an empty save directory.
fn blank_world(world_name: &str) -> WorldState {
    let size = 64u32;
    WorldState {
        world_name: world_name.to_string(),
        seed: 0,
        map_size: (size, size),
        year: 1000,
        tech_level: "fantasy".to_string(),
        magic_level: "medium".to_string(),
        biome_map: vec![vec!["grassland".to_string(); size as usize]; size as usize],
        points_of_interest: vec![PointOfInterest {
            id: "capital".to_string(),
            name: "The Capital".to_string(),
            kind: rpg_domain::PoiType::Capital,
            position: (size as i32 / 2, size as i32 / 2),
            description: String::new(),
            controlling_faction_id: String::new(),
            npcs: Vec::new(),
        }],
        factions: vec![Faction {
            id: "neutral".to_string(),
            name: "Unaligned".to_string(),
            kind: "neutral".to_string(),
            description: String::new(),
            relations: Default::default(),
        }],
        history_log: Vec::new(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let world_name = args.world_name.clone();
    let state = rpg_server::build_state(&args.data_dir, &args.world_name, || blank_world(&world_name))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received interrupt, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    rpg_server::run_server(&args.addr, state, shutdown_rx).await?;
    Ok(())
}
