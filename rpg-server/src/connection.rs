//! Accept loop and per-connection session lifecycle (§4.5).

use std::sync::Arc;

use rpg_domain::Character;
use rpg_protocol::{read_frame, write_frame, Envelope, FrameError, MessageType};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::broadcast::broadcast_world_state;
use crate::handlers::dispatch;
use crate::state::{GameState, ServerState, Session, SharedState};

#[derive(Deserialize)]
struct LoginPayload {
    character_id: String,
}

/// Picks a safe spawn point for a character whose saved position is out of
/// bounds or on an impassable tile: the world's capital POI if it has one,
/// otherwise the map center (§4.5 step 4).
fn safe_spawn(game: &GameState) -> (i32, i32) {
    if let Some(capital) = game
        .world
        .points_of_interest
        .iter()
        .find(|poi| matches!(poi.kind, rpg_domain::PoiType::Capital))
    {
        return capital.position;
    }
    ((game.world.map_size.0 / 2) as i32, (game.world.map_size.1 / 2) as i32)
}

fn relocate_if_invalid(character: &mut Character, game: &GameState) {
    let (x, y) = character.position;
    if !game.world.is_passable(x, y) {
        character.position = safe_spawn(game);
    }
}

/// Drives one client connection end to end: login handshake, registration,
/// command loop, then save-and-cleanup. Never returns an `Err`; all failures
/// are logged and treated as disconnection.
pub async fn handle_connection(socket: TcpStream, state: SharedState) {
    if let Err(e) = socket.set_nodelay(true) {
        tracing::debug!(error = %e, "failed to set TCP_NODELAY");
    }
    let (mut read_half, mut write_half) = socket.into_split();

    let login = match read_frame(&mut read_half).await {
        Ok(envelope) if envelope.message_type == MessageType::Login => envelope,
        Ok(_) => {
            let _ = write_frame(&mut write_half, &Envelope::error("expected LOGIN as the first message")).await;
            return;
        }
        Err(FrameError::Closed) => return,
        Err(e) => {
            tracing::debug!(error = %e, "connection closed before login");
            return;
        }
    };

    let character_id = match serde_json::from_value::<LoginPayload>(login.data) {
        Ok(payload) => payload.character_id,
        Err(_) => {
            let _ = write_frame(&mut write_half, &Envelope::error("malformed LOGIN payload")).await;
            return;
        }
    };

    let mut character = match state.characters.load(&character_id) {
        Ok(Some(character)) => character,
        Ok(None) => {
            let _ = write_frame(&mut write_half, &Envelope::error(format!("unknown character: {character_id}"))).await;
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, character_id, "failed to load character save");
            let _ = write_frame(&mut write_half, &Envelope::error("failed to load character")).await;
            return;
        }
    };

    let player_id = Uuid::new_v4();
    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<Envelope>();

    let initial = {
        let mut game = state.game.lock().unwrap();
        relocate_if_invalid(&mut character, &game);

        let mut players = serde_json::Map::new();
        for (id, session) in &game.sessions {
            players.insert(id.to_string(), serde_json::to_value(&session.character).expect("Character always serializes"));
        }
        players.insert(player_id.to_string(), serde_json::to_value(&character).expect("Character always serializes"));

        let world = serde_json::to_value(&game.world).expect("WorldState always serializes");
        let initial = Envelope::new(
            MessageType::InitialWorldState,
            serde_json::json!({
                "world": world,
                "player_character_id": player_id.to_string(),
                "players": players,
            }),
        );

        game.sessions.insert(
            player_id,
            Session {
                character,
                save_id: character_id.clone(),
                outbox: outbox_tx.clone(),
            },
        );
        initial
    };

    if write_frame(&mut write_half, &initial).await.is_err() {
        cleanup_session(&state, player_id);
        return;
    }

    let writer = tokio::spawn(async move {
        while let Some(envelope) = outbox_rx.recv().await {
            if write_frame(&mut write_half, &envelope).await.is_err() {
                break;
            }
        }
    });

    loop {
        let envelope = match read_frame(&mut read_half).await {
            Ok(envelope) => envelope,
            Err(FrameError::Closed) => break,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "connection error, ending session");
                break;
            }
        };

        if let Err(e) = dispatch(&state, player_id, &envelope) {
            let _ = outbox_tx.send(Envelope::error(e.to_string()));
        }
    }

    drop(outbox_tx);
    writer.abort();
    cleanup_session(&state, player_id);
    broadcast_world_state(&state);
}

/// §4.5 step 8: persist the character, then drop it from the session table.
fn cleanup_session(state: &SharedState, player_id: Uuid) {
    let mut game = state.game.lock().unwrap();
    if let Some(session) = game.sessions.remove(&player_id) {
        if let Err(e) = state.characters.save(&session.character, &session.save_id) {
            tracing::warn!(%player_id, error = %e, "failed to save character on disconnect");
        }
    }
}

