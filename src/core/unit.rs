//! Fielded hero instances.
//!
//! ## UnitId
//!
//! Identifier unique within a room. Blue units are numbered first.
//!
//! ## Unit
//!
//! Live combat stats plus equipment slots and per-match hero flags. Stat
//! mutators keep the unit invariants: `0 <= health <= max_health`,
//! `shield >= 0`, crit chance in `[0, 1]`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::Faction;
use crate::catalog::{EffectKind, EquipmentItem, HeroDefinition, HeroKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

/// Hero-specific state that persists for the whole match.
///
/// Nothing here resets at turn boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroFlags {
    /// Last-stand revive consumed.
    pub last_stand_used: bool,
    /// Points accrued from damaging basic attacks, read by the scaling ability.
    pub stolen_points: u32,
    /// Dodge bonus stacks earned from critical hits.
    pub dodge_stacks: u32,
    /// Ability has been used at least once.
    pub skill_used: bool,
}

/// Result of a heal that may overflow into shield.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealOverflow {
    pub healed: i64,
    pub overflow_shield: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub faction: Faction,
    pub hero: HeroKind,
    pub name: String,
    pub health: i64,
    pub max_health: i64,
    pub shield: i64,
    pub attack: i64,
    pub armor: i64,
    crit_rate: f64,
    pub crit_damage: f64,
    pub dodge_rate: f64,
    pub skill_cost: u32,
    pub skill_ends_turn: bool,
    pub equipment: SmallVec<[EquipmentItem; 2]>,
    pub flags: HeroFlags,
}

impl Unit {
    /// Field a hero at full health.
    pub fn from_definition(id: UnitId, faction: Faction, definition: &HeroDefinition) -> Self {
        Self {
            id,
            faction,
            hero: definition.kind,
            name: definition.name.clone(),
            health: definition.max_health,
            max_health: definition.max_health,
            shield: 0,
            attack: definition.attack,
            armor: definition.armor,
            crit_rate: definition.crit_rate.clamp(0.0, 1.0),
            crit_damage: definition.crit_damage,
            dodge_rate: definition.dodge_rate,
            skill_cost: definition.skill_cost,
            skill_ends_turn: definition.skill_ends_turn,
            equipment: SmallVec::new(),
            flags: HeroFlags::default(),
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    #[must_use]
    pub fn crit_rate(&self) -> f64 {
        self.crit_rate
    }

    /// Set crit chance, clamped to `[0, 1]`.
    pub fn set_crit_rate(&mut self, rate: f64) {
        self.crit_rate = rate.clamp(0.0, 1.0);
    }

    #[must_use]
    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }

    #[must_use]
    pub fn lost_health(&self) -> i64 {
        self.max_health - self.health
    }

    /// Dodge chance including crit-earned stacks.
    #[must_use]
    pub fn effective_dodge(&self, per_stack: f64) -> f64 {
        (self.dodge_rate + self.flags.dodge_stacks as f64 * per_stack).clamp(0.0, 1.0)
    }

    /// Heal clamped to max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i64) -> i64 {
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health);
        self.health - before
    }

    /// Heal with any excess over max health converted to shield.
    pub fn heal_with_overflow(&mut self, amount: i64) -> HealOverflow {
        let amount = amount.max(0);
        let overflow = (self.health + amount - self.max_health).max(0);
        let healed = self.heal(amount);
        self.shield += overflow;
        HealOverflow {
            healed,
            overflow_shield: overflow,
        }
    }

    pub fn add_shield(&mut self, amount: i64) {
        self.shield += amount.max(0);
    }

    /// Sum of one effect kind across equipped items.
    #[must_use]
    pub fn equipment_total(&self, kind: EffectKind) -> f64 {
        self.equipment.iter().map(|item| item.total(kind)).sum()
    }

    /// Number of equipped copies of an item id.
    #[must_use]
    pub fn equipped_count(&self, item_id: &str) -> usize {
        self.equipment.iter().filter(|item| item.id == item_id).count()
    }

    /// Snapshot of the combat-relevant stats.
    #[must_use]
    pub fn stats(&self) -> UnitStats {
        UnitStats {
            id: self.id,
            health: self.health,
            max_health: self.max_health,
            shield: self.shield,
            attack: self.attack,
            armor: self.armor,
            crit_rate: self.crit_rate,
            crit_damage: self.crit_damage,
            dodge_rate: self.dodge_rate,
        }
    }
}

/// Post-resolution stat snapshot sent with every outcome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub id: UnitId,
    pub health: i64,
    pub max_health: i64,
    pub shield: i64,
    pub attack: i64,
    pub armor: i64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub dodge_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HeroCatalog;

    fn dolia() -> Unit {
        let def = HeroCatalog::builtin().get(HeroKind::Dolia).unwrap();
        Unit::from_definition(UnitId::new(1), Faction::Blue, &def)
    }

    #[test]
    fn test_fielded_at_full_health() {
        let unit = dolia();
        assert_eq!(unit.health, 900);
        assert_eq!(unit.max_health, 900);
        assert_eq!(unit.shield, 0);
        assert!(unit.equipment.is_empty());
        assert_eq!(unit.flags, HeroFlags::default());
    }

    #[test]
    fn test_heal_clamps() {
        let mut unit = dolia();
        unit.health = 850;
        assert_eq!(unit.heal(130), 50);
        assert_eq!(unit.health, 900);
        assert_eq!(unit.heal(-10), 0);
    }

    #[test]
    fn test_heal_overflow_to_shield() {
        let mut unit = dolia();
        unit.health = 860;
        let result = unit.heal_with_overflow(75);
        assert_eq!(result, HealOverflow { healed: 40, overflow_shield: 35 });
        assert_eq!(unit.health, 900);
        assert_eq!(unit.shield, 35);
    }

    #[test]
    fn test_crit_rate_clamped() {
        let mut unit = dolia();
        unit.set_crit_rate(1.7);
        assert_eq!(unit.crit_rate(), 1.0);
        unit.set_crit_rate(-0.2);
        assert_eq!(unit.crit_rate(), 0.0);
    }

    #[test]
    fn test_effective_dodge() {
        let mut unit = dolia();
        unit.dodge_rate = 0.25;
        unit.flags.dodge_stacks = 2;
        assert!((unit.effective_dodge(0.05) - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_health_fraction_and_lost() {
        let mut unit = dolia();
        unit.health = 450;
        assert_eq!(unit.health_fraction(), 0.5);
        assert_eq!(unit.lost_health(), 450);
    }

    #[test]
    fn test_display() {
        assert_eq!(UnitId::new(4).to_string(), "Unit(4)");
    }
}
