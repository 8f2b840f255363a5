//! Command-handler business logic (§4.6), independent of the networking and
//! locking that `rpg-server` wraps around it.

use crate::error::DomainError;
use crate::fog::reveal_around;
use crate::model::{Character, PointOfInterest, WorldState};
use crate::rules;

/// `PLAYER_MOVE {dx, dy}`: validates, mutates `character.position`, and
/// reveals fog around the new position.
pub fn move_character(character: &mut Character, world: &WorldState, dx: i32, dy: i32) -> Result<(), DomainError> {
    if dx.abs() > 1 || dy.abs() > 1 {
        return Err(DomainError::InvalidMove);
    }

    let new_x = character.position.0 + dx;
    let new_y = character.position.1 + dy;

    let (w, h) = world.map_size;
    if new_x < 0 || new_y < 0 || new_x as u32 >= w || new_y as u32 >= h {
        return Err(DomainError::OutOfBounds);
    }
    if !world.is_passable(new_x, new_y) {
        return Err(DomainError::ImpassableTile);
    }

    character.position = (new_x, new_y);
    let revealed = reveal_around(character.position, (w as i32, h as i32));
    character.discovered_cells.extend(revealed);
    Ok(())
}

/// `EQUIP_ITEM {item_id}`: moves the item from inventory into its slot,
/// displacing any current occupant back to inventory.
pub fn equip_item(character: &mut Character, item_id: &str) -> Result<(), DomainError> {
    let idx = character
        .inventory
        .iter()
        .position(|item| item.id == item_id)
        .ok_or(DomainError::ItemNotInInventory)?;

    if !character.inventory[idx].slot.is_equippable() {
        return Err(DomainError::NotEquippable(character.inventory[idx].slot.as_str().to_string()));
    }

    let item = character.inventory.remove(idx);
    let slot_key = item.slot.as_str().to_string();
    if let Some(occupant) = character.equipment.remove(&slot_key) {
        character.inventory.push(occupant);
    }
    character.equipment.insert(slot_key, item);
    Ok(())
}

/// `UNEQUIP_ITEM {slot}`: moves the occupant of `slot` back to inventory.
pub fn unequip_item(character: &mut Character, slot: &str) -> Result<(), DomainError> {
    let item = character.equipment.remove(slot).ok_or(DomainError::SlotNotOccupied)?;
    character.inventory.push(item);
    Ok(())
}

/// `USE_ITEM {item_id}`: applies on-use effects; removes the item only if
/// consumption succeeded.
pub fn use_item(character: &mut Character, item_id: &str) -> Result<(), DomainError> {
    let idx = character
        .inventory
        .iter()
        .position(|item| item.id == item_id)
        .ok_or(DomainError::ItemNotInInventory)?;

    if !matches!(character.inventory[idx].slot, crate::model::Slot::Consumable) {
        return Err(DomainError::NotConsumable);
    }

    let item = character.inventory[idx].clone();
    if rules::apply_use_effects(character, &item) {
        character.inventory.remove(idx);
    }
    Ok(())
}

/// `PLAYER_ENTERED_POI {poi_id}`: marks the POI visited; generates and
/// persists its description exactly once, the first time any player enters.
pub fn enter_poi(character: &mut Character, poi: &mut PointOfInterest, generate_description: impl FnOnce() -> String) {
    if character.visited_pois.iter().any(|id| id == &poi.id) {
        return;
    }
    character.visited_pois.push(poi.id.clone());
    if poi.description.is_empty() {
        poi.description = generate_description();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, PoiType, Slot};

    fn flat_world(w: u32, h: u32, biome: &str) -> WorldState {
        WorldState {
            world_name: "test".into(),
            seed: 1,
            map_size: (w, h),
            year: 1000,
            tech_level: "fantasy".into(),
            magic_level: "medium".into(),
            biome_map: vec![vec![biome.to_string(); w as usize]; h as usize],
            points_of_interest: Vec::new(),
            factions: Vec::new(),
            history_log: Vec::new(),
        }
    }

    #[test]
    fn move_from_origin_with_negative_offset_is_rejected() {
        let world = flat_world(10, 10, "grassland");
        let mut character = Character::new("Aria", "");
        character.position = (0, 0);
        assert!(matches!(
            move_character(&mut character, &world, -1, 0),
            Err(DomainError::OutOfBounds)
        ));
    }

    #[test]
    fn move_onto_impassable_biome_is_rejected() {
        let world = flat_world(10, 10, "ocean");
        let mut character = Character::new("Aria", "");
        character.position = (5, 5);
        assert!(matches!(
            move_character(&mut character, &world, 1, 0),
            Err(DomainError::ImpassableTile)
        ));
    }

    #[test]
    fn move_too_far_in_one_step_is_rejected() {
        let world = flat_world(10, 10, "grassland");
        let mut character = Character::new("Aria", "");
        character.position = (5, 5);
        assert!(matches!(
            move_character(&mut character, &world, 2, 0),
            Err(DomainError::InvalidMove)
        ));
    }

    #[test]
    fn successful_move_reveals_fog_around_new_position() {
        let world = flat_world(20, 20, "grassland");
        let mut character = Character::new("Aria", "");
        character.position = (10, 10);
        move_character(&mut character, &world, 1, 0).unwrap();
        assert_eq!(character.position, (11, 10));
        assert!(!character.discovered_cells.is_empty());
    }

    fn sword() -> Item {
        Item {
            id: "sword".into(),
            name: "Sword".into(),
            description: String::new(),
            slot: Slot::Weapon,
            effects: vec![],
        }
    }

    #[test]
    fn equip_then_unequip_restores_original_inventory_and_equipment() {
        let mut character = Character::new("Aria", "");
        character.inventory.push(sword());

        equip_item(&mut character, "sword").unwrap();
        assert!(character.inventory.is_empty());
        assert!(character.equipment.contains_key("weapon"));

        unequip_item(&mut character, "weapon").unwrap();
        assert_eq!(character.inventory.len(), 1);
        assert!(character.equipment.is_empty());
    }

    #[test]
    fn equipping_a_consumable_is_rejected() {
        let mut character = Character::new("Aria", "");
        character.inventory.push(Item {
            id: "potion".into(),
            name: "Potion".into(),
            description: String::new(),
            slot: Slot::Consumable,
            effects: vec![],
        });
        assert!(matches!(
            equip_item(&mut character, "potion"),
            Err(DomainError::NotEquippable(_))
        ));
    }

    #[test]
    fn equipping_into_an_occupied_slot_displaces_the_occupant_to_inventory() {
        let mut character = Character::new("Aria", "");
        character.equipment.insert("weapon".to_string(), sword());
        character.inventory.push(Item {
            id: "axe".into(),
            name: "Axe".into(),
            description: String::new(),
            slot: Slot::Weapon,
            effects: vec![],
        });

        equip_item(&mut character, "axe").unwrap();
        assert_eq!(character.equipment.get("weapon").unwrap().id, "axe");
        assert_eq!(character.inventory[0].id, "sword");
    }

    #[test]
    fn entering_a_poi_twice_only_generates_description_once() {
        let mut character = Character::new("Aria", "");
        let mut poi = PointOfInterest {
            id: "capital".into(),
            name: "Capital".into(),
            kind: PoiType::Capital,
            position: (0, 0),
            description: String::new(),
            controlling_faction_id: String::new(),
            npcs: vec![],
        };

        let mut generations = 0;
        enter_poi(&mut character, &mut poi, || {
            generations += 1;
            "a grand capital".to_string()
        });
        enter_poi(&mut character, &mut poi, || {
            generations += 1;
            "should not run".to_string()
        });

        assert_eq!(generations, 1);
        assert_eq!(poi.description, "a grand capital");
    }
}
