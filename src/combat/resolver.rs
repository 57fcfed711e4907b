//! Basic attack resolution.
//!
//! Steps run in a fixed order:
//!
//! 1. armor-reduced base damage
//! 2. execute bonus
//! 3. damage amplification, one step per equipped effect
//! 4. critical roll (always drawn)
//! 5. dodge roll (only drawn when the target can dodge)
//! 6. shield then health, with the last-stand check
//! 7. on-hit passives for non-dodged damaging hits

use super::damage::{self, base_damage, roll_crit, scaled};
use super::outcome::{AmplifyStep, AttackOutcome};
use super::passives::{self, PassiveEvent, DODGE_PER_STACK};
use crate::catalog::EffectKind;
use crate::core::{ArenaError, MatchState, RandomSource, Result, UnitId};

pub struct CombatResolver;

impl CombatResolver {
    /// Resolve one attack from `attacker_id` on `target_id`.
    ///
    /// Both units must exist and be alive, and belong to opposing factions.
    /// Nothing is mutated when validation fails.
    pub fn resolve_attack(
        state: &mut MatchState,
        rng: &mut impl RandomSource,
        attacker_id: UnitId,
        target_id: UnitId,
    ) -> Result<AttackOutcome> {
        let attacker = state
            .unit(attacker_id)
            .filter(|unit| unit.is_alive())
            .ok_or(ArenaError::UnitNotFound(attacker_id))?;
        let target = state
            .unit(target_id)
            .filter(|unit| unit.is_alive())
            .ok_or(ArenaError::UnitNotFound(target_id))?;
        if attacker.faction == target.faction {
            return Err(ArenaError::InvalidTarget {
                actor: attacker_id,
                target: target_id,
            });
        }

        let mut events = Vec::new();

        let base = base_damage(attacker.attack, target.armor);
        let mut running = base;

        if let Some(bonus) = passives::execute_bonus(attacker.hero, target.health_fraction(), running) {
            running += bonus;
            events.push(PassiveEvent::Execute {
                unit: attacker_id,
                bonus,
            });
        }

        let mut amplifiers = Vec::new();
        for item in &attacker.equipment {
            for effect in item.effects.iter().filter(|e| e.kind == EffectKind::DamageAmplify) {
                let bonus = scaled(running, effect.value);
                running += bonus;
                tracing::debug!(unit = %attacker_id, item = %item.id, rate = effect.value, bonus, "damage amplified");
                amplifiers.push(AmplifyStep {
                    item_id: item.id.clone(),
                    rate: effect.value,
                    bonus,
                });
            }
        }

        let (running, is_critical) = roll_crit(rng, running, attacker.crit_rate(), attacker.crit_damage);
        let original_damage = running;

        let dodge_chance = target.effective_dodge(DODGE_PER_STACK);
        let is_dodged = dodge_chance > 0.0 && rng.roll(dodge_chance);

        if is_critical {
            events.extend(passives::dodge_focus(state, attacker_id));
        }

        let applied = if is_dodged { 0 } else { original_damage };
        if is_dodged {
            events.extend(passives::dodge_counter(state, target_id));
        }

        let report = damage::deal_damage(state, target_id, applied)?;
        events.extend(report.last_stand.clone());

        if !is_dodged && applied > 0 {
            events.extend(passives::skill_point_proc(state, rng, attacker_id));
            events.extend(passives::steal_point(state, attacker_id));
            events.extend(passives::guardian_shield(state, target_id));
        }

        let attacker_stats = state.require_unit(attacker_id)?.stats();
        let target_unit = state.require_unit(target_id)?;
        let outcome = AttackOutcome {
            attacker: attacker_id,
            target: target_id,
            base_damage: base,
            damage: applied,
            original_damage,
            amplifiers,
            is_critical,
            is_dodged,
            absorbed: report.absorbed,
            target_health: target_unit.health,
            target_shield: target_unit.shield,
            target_dead: !target_unit.is_alive(),
            passives: events,
            attacker_stats,
            target_stats: target_unit.stats(),
        };

        tracing::debug!(
            attacker = %attacker_id,
            target = %target_id,
            damage = outcome.damage,
            crit = outcome.is_critical,
            dodged = outcome.is_dodged,
            dead = outcome.target_dead,
            "attack resolved"
        );
        Ok(outcome)
    }
}
