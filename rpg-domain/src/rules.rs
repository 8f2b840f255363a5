//! Stat resolution and item-effect application (`rpg/rules.py` in the
//! original `RulesEngine`).

use std::collections::HashMap;

use rand::Rng;

use crate::model::{Character, Effect, FlagAction, HealValue, Item, Stats};

/// Trait-id → effects, the data a `RulesEngine` would otherwise load from
/// `game_data/traits.json`. Character creation and trait content are out of
/// scope (§1); this registry is the seam a caller plugs real trait data into.
#[derive(Default, Clone, Debug)]
pub struct TraitRegistry(HashMap<String, Vec<Effect>>);

impl TraitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, trait_id: impl Into<String>, effects: Vec<Effect>) {
        self.0.insert(trait_id.into(), effects);
    }

    pub fn effects_for(&self, trait_id: &str) -> &[Effect] {
        self.0.get(trait_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn add_stat(stats: &mut Stats, stat: &str, value: i32) {
    match stat {
        "strength" => stats.strength += value,
        "dexterity" => stats.dexterity += value,
        "intelligence" => stats.intelligence += value,
        "charisma" => stats.charisma += value,
        _ => tracing::warn!(stat, "unknown stat name in stat_modifier effect, ignored"),
    }
}

/// `final_stats(character) = base_stats + Σ stat_modifiers from traits + Σ
/// stat_modifiers from equipped items` (§4.6). Traits apply first, then
/// equipment, matching `calculate_final_stats`'s confirmed order; since both
/// passes only ever add, the order has no effect on the result.
pub fn calculate_final_stats(character: &Character, traits: &TraitRegistry) -> Stats {
    let mut stats = character.stats;

    for trait_id in &character.traits {
        for effect in traits.effects_for(trait_id) {
            if let Effect::StatModifier { stat, value, .. } = effect {
                add_stat(&mut stats, stat, *value);
            }
        }
    }

    for item in character.equipment.values() {
        for effect in &item.effects {
            if let Effect::StatModifier { stat, value, .. } = effect {
                add_stat(&mut stats, stat, *value);
            }
        }
    }

    stats
}

fn roll_dice_expr(expr: &str) -> Option<i32> {
    let mut halves = expr.splitn(2, '+');
    let dice_part = halves.next()?;
    let bonus: i32 = match halves.next() {
        Some(b) => b.trim().parse().ok()?,
        None => 0,
    };

    let mut dice_halves = dice_part.splitn(2, 'd');
    let num_dice: i32 = dice_halves.next()?.trim().parse().ok()?;
    let dice_sides: i32 = dice_halves.next()?.trim().parse().ok()?;
    if num_dice <= 0 || dice_sides <= 0 {
        return None;
    }

    let mut rng = rand::thread_rng();
    let mut total = bonus;
    for _ in 0..num_dice {
        total += rng.gen_range(1..=dice_sides);
    }
    Some(total)
}

fn resolve_heal_amount(value: &HealValue) -> Option<i32> {
    match value {
        HealValue::Flat(n) => Some(*n),
        HealValue::Dice(expr) => roll_dice_expr(expr),
    }
}

/// Applies every `on_use = true` effect on `item` to `character`. Returns
/// `true` if the item should be consumed. Mirrors `apply_item_effects`:
/// effects without `on_use` are skipped (never consumed from item-use); an
/// unparseable heal expression, or an on-use effect type this function does
/// not recognize (`stat_modifier`/`armor_class` firing on use), aborts with
/// `false` and leaves the item unconsumed.
pub fn apply_use_effects(character: &mut Character, item: &Item) -> bool {
    if item.effects.is_empty() {
        return false;
    }

    for effect in &item.effects {
        if !effect.on_use() {
            continue;
        }

        match effect {
            Effect::Heal { value, .. } => match resolve_heal_amount(value) {
                Some(amount) => {
                    character.current_hp = (character.current_hp + amount).min(character.max_hp);
                }
                None => return false,
            },
            Effect::FlagModifier { flag, action, .. } => match action {
                FlagAction::Add => {
                    if !character.active_flags.iter().any(|f| f == flag) {
                        character.active_flags.push(flag.clone());
                    }
                }
                FlagAction::Remove => {
                    character.active_flags.retain(|f| f != flag);
                }
            },
            Effect::StatModifier { .. } | Effect::ArmorClass { .. } => {
                return false;
            }
        }
    }

    true
}
