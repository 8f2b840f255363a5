//! World-state broadcast (§4.8): snapshot taken under the lock, sent to every
//! session's outbox after the lock is released.

use serde_json::Map;

use rpg_protocol::{Envelope, MessageType};

use crate::state::SharedState;

pub fn broadcast_world_state(state: &SharedState) {
    let (world, players, outboxes) = {
        let game = state.game.lock().unwrap();
        let world = serde_json::to_value(&game.world).expect("WorldState always serializes");
        let mut players = Map::new();
        for (player_id, session) in &game.sessions {
            players.insert(
                player_id.to_string(),
                serde_json::to_value(&session.character).expect("Character always serializes"),
            );
        }
        let outboxes = game
            .sessions
            .iter()
            .map(|(id, session)| (*id, session.outbox.clone()))
            .collect::<Vec<_>>();
        (world, players, outboxes)
    };

    let envelope = Envelope::new(
        MessageType::WorldStateUpdate,
        serde_json::json!({ "world": world, "players": players }),
    );

    // A send failure means the session's writer task has already exited;
    // its own connection handler is responsible for removing it from the
    // session table, so there is nothing further to do here.
    for (player_id, outbox) in outboxes {
        if outbox.send(envelope.clone()).is_err() {
            tracing::debug!(%player_id, "dropped broadcast to a session that already disconnected");
        }
    }
}
