//! Game world and character shapes (§3).

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_HP, DEFAULT_STARTING_HP};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub charisma: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            intelligence: 10,
            charisma: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Head,
    Chest,
    Legs,
    Feet,
    Hands,
    Cloak,
    Amulet,
    Ring,
    Weapon,
    Shield,
    Consumable,
    Misc,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Head => "head",
            Slot::Chest => "chest",
            Slot::Legs => "legs",
            Slot::Feet => "feet",
            Slot::Hands => "hands",
            Slot::Cloak => "cloak",
            Slot::Amulet => "amulet",
            Slot::Ring => "ring",
            Slot::Weapon => "weapon",
            Slot::Shield => "shield",
            Slot::Consumable => "consumable",
            Slot::Misc => "misc",
        }
    }

    /// Consumables and catch-all "misc" items are never equipped (§4.6).
    pub fn is_equippable(&self) -> bool {
        !matches!(self, Slot::Consumable | Slot::Misc)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagAction {
    Add,
    Remove,
}

/// A dice-expression (`"2d4+2"` or `"2d4"`) or a flat integer heal amount.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealValue {
    Dice(String),
    Flat(i32),
}

/// Tagged item/trait effect (§3). `on_use` governs whether it fires when an
/// item is consumed (§4.6) versus applying passively through equipment/traits
/// (§4.6 stat resolution).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    #[serde(rename = "stat_modifier")]
    StatModifier {
        stat: String,
        value: i32,
        #[serde(default)]
        on_use: bool,
    },
    #[serde(rename = "heal")]
    Heal {
        value: HealValue,
        #[serde(default)]
        on_use: bool,
    },
    #[serde(rename = "flag_modifier")]
    FlagModifier {
        flag: String,
        action: FlagAction,
        #[serde(default)]
        on_use: bool,
    },
    #[serde(rename = "armor_class")]
    ArmorClass {
        value: i32,
        #[serde(default)]
        on_use: bool,
    },
}

impl Effect {
    pub fn on_use(&self) -> bool {
        match self {
            Effect::StatModifier { on_use, .. }
            | Effect::Heal { on_use, .. }
            | Effect::FlagModifier { on_use, .. }
            | Effect::ArmorClass { on_use, .. } => *on_use,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub slot: Slot,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Objective {
    pub text: String,
    pub completed: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<(i32, i32)>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: QuestStatus,
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NPC {
    pub name: String,
    pub profession: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiType {
    Capital,
    Town,
    Ruin,
    Dungeon,
    NaturalWonder,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PoiType,
    pub position: (i32, i32),
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub controlling_faction_id: String,
    #[serde(default)]
    pub npcs: Vec<NPC>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Faction {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub relations: BTreeMap<String, i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldState {
    pub world_name: String,
    pub seed: u64,
    pub map_size: (u32, u32),
    #[serde(default = "default_year")]
    pub year: i32,
    #[serde(default = "default_tech_level")]
    pub tech_level: String,
    #[serde(default = "default_magic_level")]
    pub magic_level: String,
    #[serde(default)]
    pub biome_map: Vec<Vec<String>>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
    #[serde(default)]
    pub factions: Vec<Faction>,
    #[serde(default)]
    pub history_log: Vec<String>,
}

fn default_year() -> i32 {
    1000
}
fn default_tech_level() -> String {
    "fantasy".to_string()
}
fn default_magic_level() -> String {
    "medium".to_string()
}

impl WorldState {
    /// `true` if `(x, y)` lies within `map_size` and on a passable biome.
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.map_size.0 || y as u32 >= self.map_size.1 {
            return false;
        }
        self.biome_map
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .map(|biome| crate::biome::is_passable(biome))
            .unwrap_or(false)
    }
}

mod cells_as_list {
    use std::collections::HashSet;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(cells: &HashSet<(i32, i32)>, serializer: S) -> Result<S::Ok, S::Error> {
        let list: Vec<(i32, i32)> = cells.iter().copied().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HashSet<(i32, i32)>, D::Error> {
        let list = Vec::<(i32, i32)>::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub backstory: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub equipment: BTreeMap<String, Item>,
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default)]
    pub position: (i32, i32),
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default = "default_max_hp")]
    pub max_hp: i32,
    #[serde(default = "default_current_hp")]
    pub current_hp: i32,
    #[serde(default)]
    pub active_flags: Vec<String>,
    #[serde(default, with = "cells_as_list")]
    pub discovered_cells: HashSet<(i32, i32)>,
    #[serde(default)]
    pub visited_pois: Vec<String>,
}

fn default_max_hp() -> i32 {
    DEFAULT_MAX_HP
}
fn default_current_hp() -> i32 {
    DEFAULT_STARTING_HP
}

impl Character {
    pub fn new(name: impl Into<String>, backstory: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backstory: backstory.into(),
            traits: Vec::new(),
            stats: Stats::default(),
            equipment: BTreeMap::new(),
            inventory: Vec::new(),
            position: (0, 0),
            quests: Vec::new(),
            max_hp: DEFAULT_MAX_HP,
            current_hp: DEFAULT_STARTING_HP,
            active_flags: Vec::new(),
            discovered_cells: HashSet::new(),
            visited_pois: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovered_cells_round_trips_through_json_as_a_list() {
        let mut character = Character::new("Aria", "a wanderer");
        character.discovered_cells.insert((1, 2));
        character.discovered_cells.insert((3, 4));

        let encoded = serde_json::to_value(&character).unwrap();
        assert!(encoded["discovered_cells"].is_array());

        let decoded: Character = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.discovered_cells, character.discovered_cells);
    }

    #[test]
    fn consumable_and_misc_slots_are_not_equippable() {
        assert!(!Slot::Consumable.is_equippable());
        assert!(!Slot::Misc.is_equippable());
        assert!(Slot::Weapon.is_equippable());
    }
}
