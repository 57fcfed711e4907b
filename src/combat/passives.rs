//! Hero passives that fire during damage resolution and at turn start.
//!
//! Each passive is keyed off `HeroKind` and reports what it changed as a
//! [`PassiveEvent`] so clients never have to re-derive the numbers.

use serde::{Deserialize, Serialize};

use crate::catalog::{EffectKind, HeroKind};
use crate::core::{Faction, MatchState, RandomSource, UnitId};

/// Lan: bonus damage against targets below this health fraction.
pub const EXECUTE_THRESHOLD: f64 = 0.5;
pub const EXECUTE_BONUS: f64 = 0.30;

/// Gongsun Li: gains on a successful dodge.
pub const DODGE_COUNTER_ATTACK: i64 = 10;
pub const DODGE_COUNTER_CRIT: f64 = 0.05;
/// Gongsun Li: dodge gained per critical hit, and the stack cap.
pub const DODGE_PER_STACK: f64 = 0.05;
pub const DODGE_STACK_CAP: u32 = 5;

/// Da Qiao: once per match, survive lethal damage at 1 health.
pub const LAST_STAND_SKILL_POINTS: u32 = 3;
pub const LAST_STAND_SHIELD_PER_POINT: i64 = 150;

/// Sun Shangxiang: chance of a skill point after a damaging hit.
pub const SKILL_PROC_CHANCE: f64 = 0.7;

/// Yao: shield granted to the weakest ally when Yao is hit.
pub const GUARDIAN_SHIELD_BASE: i64 = 100;
pub const GUARDIAN_SHIELD_RATE: f64 = 0.03;

/// Shao Siyuan: cap on points stolen by basic attacks.
pub const STOLEN_POINT_CAP: u32 = 4;

/// Dolia: heal at the start of each of her faction's turns.
pub const REJUVENATE_HEAL: i64 = 75;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "passive", rename_all = "snake_case")]
pub enum PassiveEvent {
    Execute {
        unit: UnitId,
        bonus: i64,
    },
    DodgeCounter {
        unit: UnitId,
        attack_gain: i64,
        crit_gain: f64,
        attack: i64,
        crit_rate: f64,
    },
    DodgeFocus {
        unit: UnitId,
        stacks: u32,
        dodge_rate: f64,
    },
    LastStand {
        unit: UnitId,
        faction: Faction,
        skill_points_gained: u32,
        overflow_shield: i64,
        health: i64,
        shield: i64,
    },
    SkillPointProc {
        unit: UnitId,
        faction: Faction,
        skill_points: u32,
    },
    GuardianShield {
        source: UnitId,
        recipient: UnitId,
        shield: i64,
        recipient_shield: i64,
    },
    StolenPoint {
        unit: UnitId,
        stolen_points: u32,
    },
    Rejuvenate {
        unit: UnitId,
        target: UnitId,
        healed: i64,
        overflow_shield: i64,
        health: i64,
        shield: i64,
    },
    EquipmentRegen {
        unit: UnitId,
        healed: i64,
        health: i64,
    },
}

/// Extra damage from the execute passive, if it applies.
pub fn execute_bonus(attacker: HeroKind, target_fraction: f64, running: i64) -> Option<i64> {
    if attacker == HeroKind::Lan && target_fraction < EXECUTE_THRESHOLD {
        Some((running as f64 * EXECUTE_BONUS).floor() as i64)
    } else {
        None
    }
}

/// Permanent gains for a dodge-capable hero after dodging.
pub fn dodge_counter(state: &mut MatchState, unit_id: UnitId) -> Option<PassiveEvent> {
    let unit = state.unit_mut(unit_id)?;
    if unit.hero != HeroKind::GongsunLi {
        return None;
    }
    unit.attack += DODGE_COUNTER_ATTACK;
    let before = unit.crit_rate();
    unit.set_crit_rate(before + DODGE_COUNTER_CRIT);
    tracing::debug!(unit = %unit_id, attack = unit.attack, crit_rate = unit.crit_rate(), "dodge counter");
    Some(PassiveEvent::DodgeCounter {
        unit: unit_id,
        attack_gain: DODGE_COUNTER_ATTACK,
        crit_gain: unit.crit_rate() - before,
        attack: unit.attack,
        crit_rate: unit.crit_rate(),
    })
}

/// Dodge stack earned by a dodge-capable hero landing a critical hit.
pub fn dodge_focus(state: &mut MatchState, unit_id: UnitId) -> Option<PassiveEvent> {
    let unit = state.unit_mut(unit_id)?;
    if unit.hero != HeroKind::GongsunLi || unit.flags.dodge_stacks >= DODGE_STACK_CAP {
        return None;
    }
    unit.flags.dodge_stacks += 1;
    Some(PassiveEvent::DodgeFocus {
        unit: unit_id,
        stacks: unit.flags.dodge_stacks,
        dodge_rate: unit.effective_dodge(DODGE_PER_STACK),
    })
}

/// Revive a unit that just hit 0 health, once per match.
///
/// Skill points that do not fit under the cap become shield.
pub fn last_stand(state: &mut MatchState, unit_id: UnitId) -> Option<PassiveEvent> {
    let unit = state.unit_mut(unit_id)?;
    if unit.hero != HeroKind::DaQiao || unit.health > 0 || unit.flags.last_stand_used {
        return None;
    }
    unit.health = 1;
    unit.flags.last_stand_used = true;
    let faction = unit.faction;

    let gain = state.factions[faction].skill_points.add_capped(LAST_STAND_SKILL_POINTS);
    let overflow_shield = i64::from(gain.overflow) * LAST_STAND_SHIELD_PER_POINT;
    let unit = state.unit_mut(unit_id)?;
    unit.add_shield(overflow_shield);

    tracing::info!(unit = %unit_id, gained = gain.gained, overflow_shield, "last stand");
    Some(PassiveEvent::LastStand {
        unit: unit_id,
        faction,
        skill_points_gained: gain.gained,
        overflow_shield,
        health: unit.health,
        shield: unit.shield,
    })
}

/// Chance-based skill point after a damaging hit.
pub fn skill_point_proc(
    state: &mut MatchState,
    rng: &mut impl RandomSource,
    attacker_id: UnitId,
) -> Option<PassiveEvent> {
    let attacker = state.unit(attacker_id)?;
    if attacker.hero != HeroKind::SunShangxiang {
        return None;
    }
    let faction = attacker.faction;
    if !rng.roll(SKILL_PROC_CHANCE) {
        return None;
    }
    let gain = state.factions[faction].skill_points.add_capped(1);
    if gain.gained == 0 {
        return None;
    }
    Some(PassiveEvent::SkillPointProc {
        unit: attacker_id,
        faction,
        skill_points: state.factions[faction].skill_points.value(),
    })
}

/// Shield for the weakest living ally when the guardian hero takes damage.
pub fn guardian_shield(state: &mut MatchState, target_id: UnitId) -> Option<PassiveEvent> {
    let target = state.unit(target_id)?;
    if target.hero != HeroKind::Yao || !target.is_alive() {
        return None;
    }
    let shield = GUARDIAN_SHIELD_BASE + (target.health as f64 * GUARDIAN_SHIELD_RATE).floor() as i64;
    let recipient_id = state.lowest_health_ally(target.faction, None)?;
    let recipient = state.unit_mut(recipient_id)?;
    recipient.add_shield(shield);
    Some(PassiveEvent::GuardianShield {
        source: target_id,
        recipient: recipient_id,
        shield,
        recipient_shield: recipient.shield,
    })
}

/// One stolen point per damaging basic attack, capped.
pub fn steal_point(state: &mut MatchState, attacker_id: UnitId) -> Option<PassiveEvent> {
    let attacker = state.unit_mut(attacker_id)?;
    if attacker.hero != HeroKind::ShaoSiyuan || attacker.flags.stolen_points >= STOLEN_POINT_CAP {
        return None;
    }
    attacker.flags.stolen_points += 1;
    Some(PassiveEvent::StolenPoint {
        unit: attacker_id,
        stolen_points: attacker.flags.stolen_points,
    })
}

/// Start-of-turn heals for one faction's living units.
///
/// Dolia heals herself and the weakest other living ally, overflow to shield.
/// Any unit holding `heal_per_turn` equipment heals by that amount.
pub fn start_of_turn(state: &mut MatchState, faction: Faction) -> Vec<PassiveEvent> {
    let mut events = Vec::new();
    for unit_id in state.living(faction) {
        let Some(unit) = state.unit(unit_id) else { continue };
        let hero = unit.hero;
        let regen = unit.equipment_total(EffectKind::HealPerTurn).floor() as i64;

        if hero == HeroKind::Dolia {
            let ally = state.lowest_health_ally(faction, Some(unit_id));
            for target in std::iter::once(unit_id).chain(ally) {
                if let Some(event) = rejuvenate(state, unit_id, target) {
                    events.push(event);
                }
            }
        }

        if regen > 0 {
            if let Some(unit) = state.unit_mut(unit_id) {
                let healed = unit.heal(regen);
                events.push(PassiveEvent::EquipmentRegen {
                    unit: unit_id,
                    healed,
                    health: unit.health,
                });
            }
        }
    }
    events
}

fn rejuvenate(state: &mut MatchState, source: UnitId, target: UnitId) -> Option<PassiveEvent> {
    let unit = state.unit_mut(target)?;
    let result = unit.heal_with_overflow(REJUVENATE_HEAL);
    tracing::debug!(source = %source, target = %target, healed = result.healed, overflow = result.overflow_shield, "rejuvenate");
    Some(PassiveEvent::Rejuvenate {
        unit: source,
        target,
        healed: result.healed,
        overflow_shield: result.overflow_shield,
        health: unit.health,
        shield: unit.shield,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EquipmentCatalog, HeroCatalog};
    use crate::core::{FactionMap, RulesConfig, ScriptedRng};
    use crate::equipment::EquipmentSystem;

    fn state(blue: [HeroKind; 3], red: [HeroKind; 3]) -> MatchState {
        let catalog = HeroCatalog::builtin();
        let rosters = FactionMap::new(|faction| {
            let kinds = if faction == Faction::Blue { blue } else { red };
            kinds.iter().map(|&kind| catalog.get(kind).unwrap()).collect()
        });
        MatchState::new(RulesConfig::default(), &rosters)
    }

    fn default_state() -> MatchState {
        state(
            [HeroKind::Dolia, HeroKind::Yao, HeroKind::DaQiao],
            [HeroKind::Lan, HeroKind::GongsunLi, HeroKind::SunShangxiang],
        )
    }

    #[test]
    fn test_execute_bonus() {
        assert_eq!(execute_bonus(HeroKind::Lan, 0.49, 177), Some(53));
        assert_eq!(execute_bonus(HeroKind::Lan, 0.5, 177), None);
        assert_eq!(execute_bonus(HeroKind::Yao, 0.1, 177), None);
    }

    #[test]
    fn test_last_stand_overflow() {
        let mut state = default_state();
        state.factions[Faction::Blue].skill_points = crate::economy::BoundedCounter::new(5, 6);
        state.unit_mut(UnitId(3)).unwrap().health = 0;

        let event = last_stand(&mut state, UnitId(3)).unwrap();
        assert_eq!(
            event,
            PassiveEvent::LastStand {
                unit: UnitId(3),
                faction: Faction::Blue,
                skill_points_gained: 1,
                overflow_shield: 300,
                health: 1,
                shield: 300,
            }
        );
        assert_eq!(state.skill_points(Faction::Blue).value(), 6);

        state.unit_mut(UnitId(3)).unwrap().health = 0;
        assert!(last_stand(&mut state, UnitId(3)).is_none());
    }

    #[test]
    fn test_last_stand_only_for_owner() {
        let mut state = default_state();
        state.unit_mut(UnitId(1)).unwrap().health = 0;
        assert!(last_stand(&mut state, UnitId(1)).is_none());
    }

    #[test]
    fn test_dodge_counter_caps_crit() {
        let mut state = default_state();
        state.unit_mut(UnitId(5)).unwrap().set_crit_rate(0.98);
        let event = dodge_counter(&mut state, UnitId(5)).unwrap();
        match event {
            PassiveEvent::DodgeCounter { attack, crit_rate, crit_gain, .. } => {
                assert_eq!(attack, 585);
                assert_eq!(crit_rate, 1.0);
                assert!((crit_gain - 0.02).abs() < 1e-9);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_dodge_focus_stack_cap() {
        let mut state = default_state();
        for _ in 0..DODGE_STACK_CAP {
            assert!(dodge_focus(&mut state, UnitId(5)).is_some());
        }
        assert!(dodge_focus(&mut state, UnitId(5)).is_none());
        let unit = state.unit(UnitId(5)).unwrap();
        assert!((unit.effective_dodge(DODGE_PER_STACK) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_skill_point_proc() {
        let mut state = default_state();
        let mut hit = ScriptedRng::new(vec![0.69]);
        let event = skill_point_proc(&mut state, &mut hit, UnitId(6)).unwrap();
        assert_eq!(
            event,
            PassiveEvent::SkillPointProc { unit: UnitId(6), faction: Faction::Red, skill_points: 5 }
        );

        let mut miss = ScriptedRng::new(vec![0.7]);
        assert!(skill_point_proc(&mut state, &mut miss, UnitId(6)).is_none());
        assert_eq!(state.skill_points(Faction::Red).value(), 5);
    }

    #[test]
    fn test_guardian_shield_to_weakest() {
        let mut state = default_state();
        state.unit_mut(UnitId(3)).unwrap().health = 100;
        state.unit_mut(UnitId(2)).unwrap().health = 500;

        let event = guardian_shield(&mut state, UnitId(2)).unwrap();
        assert_eq!(
            event,
            PassiveEvent::GuardianShield {
                source: UnitId(2),
                recipient: UnitId(3),
                shield: 115,
                recipient_shield: 115,
            }
        );
    }

    #[test]
    fn test_steal_point_cap() {
        let mut state = state(
            [HeroKind::ShaoSiyuan, HeroKind::Yao, HeroKind::Lan],
            [HeroKind::Dolia, HeroKind::DaQiao, HeroKind::GongsunLi],
        );
        for expected in 1..=STOLEN_POINT_CAP {
            assert_eq!(
                steal_point(&mut state, UnitId(1)),
                Some(PassiveEvent::StolenPoint { unit: UnitId(1), stolen_points: expected })
            );
        }
        assert!(steal_point(&mut state, UnitId(1)).is_none());
        assert!(steal_point(&mut state, UnitId(2)).is_none());
    }

    #[test]
    fn test_start_of_turn_heals() {
        let mut state = default_state();
        state.unit_mut(UnitId(1)).unwrap().health = 880;
        state.unit_mut(UnitId(2)).unwrap().health = 400;
        state.unit_mut(UnitId(3)).unwrap().health = 600;
        let crystal = EquipmentCatalog::builtin().get("basic_007").unwrap();
        EquipmentSystem::equip(state.unit_mut(UnitId(3)).unwrap(), crystal, 2).unwrap();

        let events = start_of_turn(&mut state, Faction::Blue);

        let dolia = state.unit(UnitId(1)).unwrap();
        assert_eq!((dolia.health, dolia.shield), (900, 55));
        assert_eq!(state.unit(UnitId(2)).unwrap().health, 475);
        assert_eq!(state.unit(UnitId(3)).unwrap().health, 630);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_start_of_turn_skips_dead() {
        let mut state = default_state();
        state.unit_mut(UnitId(1)).unwrap().health = 0;
        let events = start_of_turn(&mut state, Faction::Blue);
        assert!(events.is_empty());
        assert_eq!(state.unit(UnitId(1)).unwrap().health, 0);
    }

    #[test]
    fn test_event_wire_shape() {
        let json = serde_json::to_value(PassiveEvent::Execute { unit: UnitId(2), bonus: 53 }).unwrap();
        assert_eq!(json, serde_json::json!({ "passive": "execute", "unit": 2, "bonus": 53 }));
    }
}
