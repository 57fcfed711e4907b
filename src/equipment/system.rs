//! Equip, unequip and craft.
//!
//! Static effects are written straight into unit stats. Combat-time effects
//! stay on the item and are read by the combat resolver and turn scheduler.

use serde::{Deserialize, Serialize};

use crate::catalog::{EffectKind, EquipmentItem, Recipe, RecipeBook};
use crate::core::{ArenaError, Faction, MatchState, Result, Unit, UnitId, UnitStats};

/// Result of a successful craft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CraftOutcome {
    pub unit: UnitId,
    pub recipe_id: String,
    pub consumed: [String; 2],
    pub result: EquipmentItem,
    pub cost: i64,
    pub gold_remaining: i64,
    pub unit_stats: UnitStats,
}

pub struct EquipmentSystem;

impl EquipmentSystem {
    /// Add an item's static effects to a unit.
    ///
    /// Max health gains raise current health by the same amount.
    pub fn apply_static_effects(unit: &mut Unit, item: &EquipmentItem) {
        for effect in item.static_effects() {
            let value = effect.value;
            match effect.kind {
                EffectKind::Attack => unit.attack += value as i64,
                EffectKind::MaxHealth => {
                    unit.max_health += value as i64;
                    unit.health += value as i64;
                }
                EffectKind::Armor => unit.armor += value as i64,
                EffectKind::CritRate => unit.set_crit_rate(unit.crit_rate() + value),
                EffectKind::CritDamage => unit.crit_damage += value,
                EffectKind::DodgeRate => unit.dodge_rate += value,
                EffectKind::DamageAmplify | EffectKind::HealPerTurn => {}
            }
            tracing::debug!(unit = %unit.id, item = %item.id, kind = ?effect.kind, value, "static effect applied");
        }
    }

    /// Exact inverse of [`Self::apply_static_effects`].
    ///
    /// Current health drops with max health but never below 1.
    pub fn remove_static_effects(unit: &mut Unit, item: &EquipmentItem) {
        for effect in item.static_effects() {
            let value = effect.value;
            match effect.kind {
                EffectKind::Attack => unit.attack -= value as i64,
                EffectKind::MaxHealth => {
                    unit.max_health -= value as i64;
                    unit.health = (unit.health - value as i64).clamp(1, unit.max_health.max(1));
                }
                EffectKind::Armor => unit.armor = (unit.armor - value as i64).max(0),
                EffectKind::CritRate => unit.set_crit_rate(unit.crit_rate() - value),
                EffectKind::CritDamage => unit.crit_damage -= value,
                EffectKind::DodgeRate => unit.dodge_rate = (unit.dodge_rate - value).max(0.0),
                EffectKind::DamageAmplify | EffectKind::HealPerTurn => {}
            }
        }
    }

    /// Put an item in a free slot and apply its static effects.
    pub fn equip(unit: &mut Unit, item: EquipmentItem, slots: usize) -> Result<()> {
        if unit.equipment.len() >= slots {
            return Err(ArenaError::EquipmentSlotsFull { unit: unit.id, slots });
        }
        Self::apply_static_effects(unit, &item);
        tracing::info!(unit = %unit.id, item = %item.id, "item equipped");
        unit.equipment.push(item);
        Ok(())
    }

    /// Remove the first equipped copy of an item, reversing its static effects.
    pub fn unequip(unit: &mut Unit, item_id: &str) -> Option<EquipmentItem> {
        let index = unit.equipment.iter().position(|item| item.id == item_id)?;
        let item = unit.equipment.remove(index);
        Self::remove_static_effects(unit, &item);
        Some(item)
    }

    /// Whether the unit holds both materials, counting duplicates.
    #[must_use]
    pub fn holds_materials(unit: &Unit, first: &str, second: &str) -> bool {
        if first == second {
            unit.equipped_count(first) >= 2
        } else {
            unit.equipped_count(first) >= 1 && unit.equipped_count(second) >= 1
        }
    }

    /// Combine two equipped materials into the recipe's advanced item.
    ///
    /// Validation happens before any mutation: the unit must exist and belong
    /// to `faction`, a recipe must match, the unit must hold both materials by
    /// count, and the faction must afford the cost.
    pub fn craft(
        state: &mut MatchState,
        recipes: &RecipeBook,
        faction: Faction,
        unit_id: UnitId,
        first: &str,
        second: &str,
    ) -> Result<CraftOutcome> {
        let unit = state.require_unit(unit_id)?;
        if unit.faction != faction {
            return Err(ArenaError::NotUnitController { faction, unit: unit_id });
        }
        let recipe: Recipe = recipes.find(first, second)?;
        if !Self::holds_materials(unit, first, second) {
            return Err(ArenaError::MaterialMismatch {
                unit: unit_id,
                first: first.to_string(),
                second: second.to_string(),
            });
        }

        let gold_remaining = state.ledger.pay_craft_cost(faction, recipe.cost)?;

        let slots = state.rules.equipment_slots;
        let unit = state.unit_mut(unit_id).ok_or(ArenaError::UnitNotFound(unit_id))?;
        for material in [first, second] {
            if Self::unequip(unit, material).is_none() {
                return Err(ArenaError::InternalConsistency(format!(
                    "{unit_id} lost material {material} mid-craft"
                )));
            }
        }
        Self::equip(unit, recipe.result.clone(), slots)?;

        tracing::info!(unit = %unit_id, recipe = %recipe.id, cost = recipe.cost, "equipment crafted");
        Ok(CraftOutcome {
            unit: unit_id,
            recipe_id: recipe.id.clone(),
            consumed: [first.to_string(), second.to_string()],
            result: recipe.result,
            cost: recipe.cost,
            gold_remaining,
            unit_stats: unit.stats(),
        })
    }
}
