//! Command handlers (§4.6): each acquires the world lock, validates, mutates,
//! releases, then the caller broadcasts from a lock-free snapshot.

use rpg_domain::DomainError;
use rpg_protocol::{Envelope, MessageType};
use serde_json::Value;
use uuid::Uuid;

use crate::broadcast::broadcast_world_state;
use crate::state::SharedState;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("player session not registered")]
    UnknownSession,
    #[error("malformed payload: missing or wrong-typed field '{0}'")]
    MalformedPayload(&'static str),
    #[error("message type not handled in the command loop: {0:?}")]
    Unhandled(MessageType),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn field_str<'a>(data: &'a Value, field: &'static str) -> Result<&'a str, HandlerError> {
    data.get(field).and_then(Value::as_str).ok_or(HandlerError::MalformedPayload(field))
}

fn field_i32(data: &Value, field: &'static str) -> Result<i32, HandlerError> {
    data.get(field)
        .and_then(Value::as_i64)
        .map(|n| n as i32)
        .ok_or(HandlerError::MalformedPayload(field))
}

/// Dispatches one client-originated envelope. Mutating handlers broadcast the
/// resulting world state themselves; `CHAT_MESSAGE` is forwarded verbatim
/// instead, without touching any character or the world.
pub fn dispatch(state: &SharedState, player_id: Uuid, envelope: &Envelope) -> Result<(), HandlerError> {
    match envelope.message_type {
        MessageType::PlayerMove => {
            let dx = field_i32(&envelope.data, "dx")?;
            let dy = field_i32(&envelope.data, "dy")?;
            {
                let mut game = state.game.lock().unwrap();
                let world = game.world.clone();
                let session = game.sessions.get_mut(&player_id).ok_or(HandlerError::UnknownSession)?;
                rpg_domain::move_character(&mut session.character, &world, dx, dy)?;
            }
            broadcast_world_state(state);
            Ok(())
        }
        MessageType::EquipItem => {
            let item_id = field_str(&envelope.data, "item_id")?.to_string();
            {
                let mut game = state.game.lock().unwrap();
                let session = game.sessions.get_mut(&player_id).ok_or(HandlerError::UnknownSession)?;
                rpg_domain::equip_item(&mut session.character, &item_id)?;
            }
            broadcast_world_state(state);
            Ok(())
        }
        MessageType::UnequipItem => {
            let slot = field_str(&envelope.data, "slot")?.to_string();
            {
                let mut game = state.game.lock().unwrap();
                let session = game.sessions.get_mut(&player_id).ok_or(HandlerError::UnknownSession)?;
                rpg_domain::unequip_item(&mut session.character, &slot)?;
            }
            broadcast_world_state(state);
            Ok(())
        }
        MessageType::UseItem => {
            let item_id = field_str(&envelope.data, "item_id")?.to_string();
            {
                let mut game = state.game.lock().unwrap();
                let session = game.sessions.get_mut(&player_id).ok_or(HandlerError::UnknownSession)?;
                rpg_domain::use_item(&mut session.character, &item_id)?;
            }
            broadcast_world_state(state);
            Ok(())
        }
        MessageType::PlayerEnteredPoi => {
            let poi_id = field_str(&envelope.data, "poi_id")?.to_string();
            {
                let mut game = state.game.lock().unwrap();
                if !game.sessions.contains_key(&player_id) {
                    return Err(HandlerError::UnknownSession);
                }
                let Some(poi) = game.world.points_of_interest.iter().position(|p| p.id == poi_id) else {
                    return Err(HandlerError::Domain(DomainError::WorldNotFound(poi_id)));
                };
                let mut poi = game.world.points_of_interest.remove(poi);
                let name = poi.name.clone();
                {
                    let session = game.sessions.get_mut(&player_id).expect("checked above");
                    rpg_domain::enter_poi(&mut session.character, &mut poi, || {
                        format!("A traveler's first look at {name} reveals a place shaped by its long history.")
                    });
                }
                game.world.points_of_interest.push(poi);
            }
            broadcast_world_state(state);
            Ok(())
        }
        MessageType::ChatMessage => {
            let sender = field_str(&envelope.data, "sender")?.to_string();
            let message = field_str(&envelope.data, "message")?.to_string();
            let outboxes = {
                let game = state.game.lock().unwrap();
                if !game.sessions.contains_key(&player_id) {
                    return Err(HandlerError::UnknownSession);
                }
                game.sessions.values().map(|s| s.outbox.clone()).collect::<Vec<_>>()
            };
            let forwarded = Envelope::new(MessageType::ChatMessage, serde_json::json!({"sender": sender, "message": message}));
            for outbox in outboxes {
                let _ = outbox.send(forwarded.clone());
            }
            Ok(())
        }
        // LOGIN is only valid once, before the command loop starts; the
        // other S->C types never originate from a client. DISCARD_ITEM is a
        // defined wire type with no specified handler behavior.
        other @ (MessageType::Login
        | MessageType::InitialWorldState
        | MessageType::WorldStateUpdate
        | MessageType::Error
        | MessageType::DiscardItem) => Err(HandlerError::Unhandled(other)),
    }
}
