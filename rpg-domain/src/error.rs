//! Domain-level error taxonomy (§7 Application/Transport kinds realized for
//! the game world).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("move offset must be within one tile in each axis")]
    InvalidMove,
    #[error("destination is outside the world bounds")]
    OutOfBounds,
    #[error("destination tile is not passable")]
    ImpassableTile,
    #[error("item is not in the character's inventory")]
    ItemNotInInventory,
    #[error("item slot '{0}' cannot be equipped")]
    NotEquippable(String),
    #[error("equipment slot is not occupied")]
    SlotNotOccupied,
    #[error("item is not a consumable")]
    NotConsumable,
    #[error("character not found: {0}")]
    CharacterNotFound(String),
    #[error("world not found: {0}")]
    WorldNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed save data: {0}")]
    Serde(#[from] serde_json::Error),
}
