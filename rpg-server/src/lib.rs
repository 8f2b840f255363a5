//! The authoritative RPG game server: a length-prefixed JSON-over-TCP
//! protocol (`rpg-protocol`) driving a single locked [`rpg_domain`] world.
//!
//! **Public API**: [`build_state`], [`run_server`], [`run_server_on_listener`].

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod state;

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rpg_domain::{CharacterStore, DomainError, TraitRegistry, WorldState, WorldStore};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;

pub use state::{GameState, ServerState, SharedState};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Loads or generates the world (§4.9) and wraps it with empty session state
/// behind the shared lock.
pub fn build_state(
    base_dir: impl AsRef<Path>,
    world_name: &str,
    generate: impl FnOnce() -> WorldState,
) -> Result<SharedState, ServerError> {
    let characters = CharacterStore::new(base_dir.as_ref())?;
    let worlds = WorldStore::new(base_dir.as_ref())?;
    let world = worlds.load_or_generate(world_name, generate)?;
    let game = GameState::new(world, TraitRegistry::new());
    Ok(Arc::new(ServerState {
        game: Mutex::new(game),
        characters,
        worlds,
    }))
}

/// Binds `addr` and runs the accept loop until `shutdown` fires.
pub async fn run_server(addr: &str, state: SharedState, shutdown: watch::Receiver<bool>) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    run_server_on_listener(listener, state, shutdown, false).await
}

/// Accept loop (§4.5 step 1-2, §5): a 1 s accept timeout so the shutdown flag
/// is observed promptly even with no incoming connections. When `once` is
/// `true`, the first accepted connection is handled inline and the loop
/// returns afterward — used by tests that want a single deterministic client.
pub async fn run_server_on_listener(
    listener: TcpListener,
    state: SharedState,
    mut shutdown: watch::Receiver<bool>,
    once: bool,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "game server listening");

    let mut handles = Vec::new();

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
            accepted = tokio::time::timeout(Duration::from_secs(1), listener.accept()) => {
                match accepted {
                    Ok(Ok((socket, peer))) => {
                        tracing::info!(%peer, "accepted connection");
                        let conn_state = state.clone();
                        if once {
                            connection::handle_connection(socket, conn_state).await;
                            break;
                        }
                        handles.push(tokio::spawn(connection::handle_connection(socket, conn_state)));
                    }
                    Ok(Err(e)) => tracing::warn!(error = %e, "accept failed"),
                    Err(_) => {} // 1s timeout tick, loop back and re-check shutdown
                }
            }
        }
    }

    tracing::info!("shutting down: persisting world and connected characters");
    persist_all(&state);

    for handle in handles {
        handle.abort();
    }

    Ok(())
}

/// §5 shutdown step 3: persist every connected character and the world state
/// while still holding the lock, before any sockets are torn down.
fn persist_all(state: &SharedState) {
    let game = state.game.lock().unwrap();
    for session in game.sessions.values() {
        if let Err(e) = state.characters.save(&session.character, &session.save_id) {
            tracing::warn!(error = %e, save_id = %session.save_id, "failed to persist character on shutdown");
        }
    }
    if let Err(e) = state.worlds.save_state(&game.world) {
        tracing::warn!(error = %e, "failed to persist world state on shutdown");
    }
}
