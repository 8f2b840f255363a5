//! Game world model, rule resolution, and persistence — everything the
//! session manager and command handlers in `rpg-server` need that isn't
//! sockets or locking.

pub mod biome;
pub mod commands;
pub mod constants;
pub mod error;
pub mod fog;
pub mod model;
pub mod persistence;
pub mod rules;

pub use commands::{enter_poi, equip_item, move_character, unequip_item, use_item};
pub use constants::{DEFAULT_MAX_HP, DEFAULT_STARTING_HP, FOG_REVEAL_SIZE, MAX_STAT_POINTS, STARTING_TRAIT_POINTS};
pub use error::DomainError;
pub use model::{
    Character, Effect, Faction, FlagAction, HealValue, Item, NPC, Objective, PointOfInterest, PoiType, Quest,
    QuestStatus, Slot, Stats, WorldState,
};
pub use persistence::{CharacterStore, WorldStore};
pub use rules::{apply_use_effects, calculate_final_stats, TraitRegistry};
