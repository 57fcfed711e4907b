//! Damage math shared by basic attacks and abilities.
//!
//! ## Armor
//!
//! `base = floor(attack * 200 / (armor + 200))`, so armor `a` removes the
//! fraction `a / (a + 200)` of incoming damage.
//!
//! ## Shield
//!
//! Shield absorbs first; whatever is left comes off health, floored at 0.

use serde::{Deserialize, Serialize};

use super::passives::{self, PassiveEvent};
use crate::core::{ArenaError, MatchState, RandomSource, Result, UnitId};

pub const ARMOR_CONSTANT: i64 = 200;

/// Armor-reduced damage before any bonus.
///
/// ```
/// use hero_duel::combat::base_damage;
///
/// assert_eq!(base_damage(400, 250), 177);
/// assert_eq!(base_damage(400, 0), 400);
/// ```
#[must_use]
pub fn base_damage(attack: i64, armor: i64) -> i64 {
    let attack = attack.max(0);
    let armor = armor.max(0);
    attack * ARMOR_CONSTANT / (armor + ARMOR_CONSTANT)
}

/// `floor(amount * rate)`.
#[must_use]
pub fn scaled(amount: i64, rate: f64) -> i64 {
    (amount as f64 * rate).floor() as i64
}

/// Roll a critical hit. Returns the possibly multiplied damage and the flag.
pub fn roll_crit(rng: &mut impl RandomSource, damage: i64, crit_rate: f64, crit_damage: f64) -> (i64, bool) {
    if rng.roll(crit_rate) {
        (scaled(damage, crit_damage), true)
    } else {
        (damage, false)
    }
}

/// Shield-first absorption. Returns `(new_shield, new_health)`.
#[must_use]
pub fn absorb(shield: i64, health: i64, damage: i64) -> (i64, i64) {
    let damage = damage.max(0);
    let shield = shield.max(0);
    let absorbed = shield.min(damage);
    let remaining = damage - absorbed;
    (shield - absorbed, (health - remaining).max(0))
}

/// What one damage application did to its target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub target: UnitId,
    pub absorbed: i64,
    pub health_loss: i64,
    pub health: i64,
    pub shield: i64,
    pub dead: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_stand: Option<PassiveEvent>,
}

/// Apply damage to a unit, then give the last-stand passive its chance.
pub fn deal_damage(state: &mut MatchState, target: UnitId, damage: i64) -> Result<DamageReport> {
    let unit = state.unit_mut(target).ok_or(ArenaError::UnitNotFound(target))?;
    let (shield, health) = absorb(unit.shield, unit.health, damage);
    let absorbed = unit.shield - shield;
    let health_loss = unit.health - health;
    unit.shield = shield;
    unit.health = health;
    tracing::debug!(unit = %target, damage, absorbed, health_loss, health, "damage applied");

    let last_stand = if health == 0 {
        passives::last_stand(state, target)
    } else {
        None
    };

    let unit = state.require_unit(target)?;
    Ok(DamageReport {
        target,
        absorbed,
        health_loss,
        health: unit.health,
        shield: unit.shield,
        dead: !unit.is_alive(),
        last_stand,
    })
}
