//! Shared game state (§5): a single mutex over the world, the session table,
//! and every connected character.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rpg_domain::{CharacterStore, Character, TraitRegistry, WorldState, WorldStore};
use rpg_protocol::Envelope;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// One logged-in player: their character, the save file it round-trips
/// through, and the outbound half of their connection's write channel.
pub struct Session {
    pub character: Character,
    pub save_id: String,
    pub outbox: UnboundedSender<Envelope>,
}

pub struct GameState {
    pub world: WorldState,
    pub sessions: HashMap<Uuid, Session>,
    pub traits: TraitRegistry,
}

impl GameState {
    pub fn new(world: WorldState, traits: TraitRegistry) -> Self {
        Self {
            world,
            sessions: HashMap::new(),
            traits,
        }
    }
}

/// Everything a connection handler needs: the locked game state plus the
/// stores used to load/save characters and persist the world.
pub struct ServerState {
    pub game: Mutex<GameState>,
    pub characters: CharacterStore,
    pub worlds: WorldStore,
}

pub type SharedState = Arc<ServerState>;
