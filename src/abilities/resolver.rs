//! Hero ability resolution.
//!
//! One arm per [`HeroKind`]. Every arm validates caster and target before
//! touching state, so a rejected ability leaves the match exactly as it was.
//!
//! ## Targeting
//!
//! | Hero           | Target                       |
//! |----------------|------------------------------|
//! | Dolia          | living ally (self allowed)   |
//! | Lan            | none (self buff)             |
//! | Gongsun Li     | none (self buff)             |
//! | Sun Shangxiang | living enemy                 |
//! | Yao            | living ally (self allowed)   |
//! | Da Qiao        | none (all living enemies)    |
//! | Shao Siyuan    | any living unit              |
//! | Yang Yuhuan    | none (all allies or enemies) |

use super::outcome::{AbilityEffect, AbilityHeal, AbilityHit, AbilityOutcome};
use crate::catalog::HeroKind;
use crate::combat::damage::{deal_damage, roll_crit, scaled};
use crate::combat::PassiveEvent;
use crate::core::{ArenaError, Faction, MatchState, RandomSource, Result, Unit, UnitId};

pub const DOLIA_HEAL: i64 = 130;
pub const LAN_ATTACK_BUFF: i64 = 100;
pub const GONGSUN_CRIT_BUFF: f64 = 0.40;
/// Crit chance above 100% converts to crit multiplier at this ratio.
pub const GONGSUN_OVERFLOW_RATIO: f64 = 0.5;
pub const GONGSUN_CRIT_DAMAGE_CAP: f64 = 2.0;
pub const SUN_ARMOR_SHRED: i64 = 60;
pub const SUN_TRUE_DAMAGE: i64 = 75;
pub const YAO_SHIELD_BASE: i64 = 170;
pub const YAO_SHIELD_RATE: f64 = 0.10;
pub const YAO_CRIT_BUFF: f64 = 0.08;
pub const YAO_ARMOR_BUFF: i64 = 25;
pub const DAQIAO_DIVISOR: i64 = 5;
pub const SHAO_POINT_CAP: u32 = 4;
pub const SHAO_HEAL_BASE: i64 = 100;
pub const SHAO_HEAL_PER_POINT: i64 = 40;
pub const SHAO_DAMAGE_BASE: i64 = 150;
pub const SHAO_DAMAGE_PER_POINT: i64 = 50;
pub const YANG_THRESHOLD: f64 = 0.5;
pub const YANG_ATTACK_RATE: f64 = 0.3;
pub const YANG_HEALTH_RATE: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TargetRule {
    None,
    Ally,
    Enemy,
    Any,
}

fn target_rule(hero: HeroKind) -> TargetRule {
    match hero {
        HeroKind::Dolia | HeroKind::Yao => TargetRule::Ally,
        HeroKind::SunShangxiang => TargetRule::Enemy,
        HeroKind::ShaoSiyuan => TargetRule::Any,
        HeroKind::Lan | HeroKind::GongsunLi | HeroKind::DaQiao | HeroKind::YangYuhuan => TargetRule::None,
    }
}

pub struct AbilityResolver;

impl AbilityResolver {
    /// Resolve `caster_id`'s ability, optionally aimed at `target`.
    pub fn resolve(
        state: &mut MatchState,
        rng: &mut impl RandomSource,
        caster_id: UnitId,
        target: Option<UnitId>,
    ) -> Result<AbilityOutcome> {
        let caster = state
            .unit(caster_id)
            .filter(|unit| unit.is_alive())
            .ok_or(ArenaError::CasterNotFound(caster_id))?;
        let hero = caster.hero;
        let faction = caster.faction;
        let target_id = Self::validate_target(state, caster, target_rule(hero), target)?;

        let mut passives = Vec::new();
        let effect = match hero {
            HeroKind::Dolia => Self::dolia(state, target_id.unwrap_or(caster_id))?,
            HeroKind::Lan => Self::lan(state, caster_id)?,
            HeroKind::GongsunLi => Self::gongsun_li(state, caster_id)?,
            HeroKind::SunShangxiang => {
                Self::sun_shangxiang(state, target_id.unwrap_or(caster_id), &mut passives)?
            }
            HeroKind::Yao => Self::yao(state, caster_id, target_id.unwrap_or(caster_id))?,
            HeroKind::DaQiao => Self::da_qiao(state, rng, caster_id, &mut passives)?,
            HeroKind::ShaoSiyuan => {
                Self::shao_siyuan(state, rng, caster_id, target_id.unwrap_or(caster_id), &mut passives)?
            }
            HeroKind::YangYuhuan => Self::yang_yuhuan(state, rng, caster_id, &mut passives)?,
        };

        let caster_stats = state.require_unit(caster_id)?.stats();
        tracing::info!(caster = %caster_id, %hero, %faction, "ability resolved");
        Ok(AbilityOutcome {
            caster: caster_id,
            hero,
            effect,
            passives,
            caster_stats,
        })
    }

    fn validate_target(
        state: &MatchState,
        caster: &Unit,
        rule: TargetRule,
        target: Option<UnitId>,
    ) -> Result<Option<UnitId>> {
        if rule == TargetRule::None {
            return Ok(None);
        }
        let unit = target
            .and_then(|id| state.unit(id))
            .filter(|unit| unit.is_alive())
            .ok_or(ArenaError::TargetNotFound(target))?;
        let wrong_side = match rule {
            TargetRule::Ally => unit.faction != caster.faction,
            TargetRule::Enemy => unit.faction == caster.faction,
            TargetRule::Any | TargetRule::None => false,
        };
        if wrong_side {
            return Err(ArenaError::InvalidTarget {
                actor: caster.id,
                target: unit.id,
            });
        }
        Ok(Some(unit.id))
    }

    fn unit_mut(state: &mut MatchState, id: UnitId) -> Result<&mut Unit> {
        state.unit_mut(id).ok_or(ArenaError::UnitNotFound(id))
    }

    fn heal(state: &mut MatchState, target: UnitId, amount: i64) -> Result<AbilityHeal> {
        let unit = Self::unit_mut(state, target)?;
        let amount = unit.heal(amount);
        Ok(AbilityHeal {
            target,
            amount,
            target_health: unit.health,
        })
    }

    /// Apply ability damage; shields still absorb first.
    fn strike(
        state: &mut MatchState,
        target: UnitId,
        damage: i64,
        is_critical: bool,
        passives: &mut Vec<PassiveEvent>,
    ) -> Result<AbilityHit> {
        let report = deal_damage(state, target, damage)?;
        passives.extend(report.last_stand);
        Ok(AbilityHit {
            target,
            damage: report.absorbed + report.health_loss,
            absorbed: report.absorbed,
            health_loss: report.health_loss,
            is_critical,
            target_health: report.health,
            target_shield: report.shield,
            target_dead: report.dead,
        })
    }

    /// Living units of `faction` in roster order.
    fn living(state: &MatchState, faction: Faction) -> Vec<UnitId> {
        state.living(faction)
    }

    fn dolia(state: &mut MatchState, target: UnitId) -> Result<AbilityEffect> {
        let heal = Self::heal(state, target, DOLIA_HEAL)?;
        Ok(AbilityEffect::Heal { heal })
    }

    fn lan(state: &mut MatchState, caster: UnitId) -> Result<AbilityEffect> {
        let unit = Self::unit_mut(state, caster)?;
        unit.attack += LAN_ATTACK_BUFF;
        Ok(AbilityEffect::AttackBuff {
            amount: LAN_ATTACK_BUFF,
            attack: unit.attack,
        })
    }

    fn gongsun_li(state: &mut MatchState, caster: UnitId) -> Result<AbilityEffect> {
        let unit = Self::unit_mut(state, caster)?;
        let before = unit.crit_rate();
        let raised = before + GONGSUN_CRIT_BUFF;
        let overflow = (raised - 1.0).max(0.0);
        unit.set_crit_rate(raised);

        let crit_damage_before = unit.crit_damage;
        if overflow > 0.0 {
            unit.crit_damage = (unit.crit_damage + overflow * GONGSUN_OVERFLOW_RATIO)
                .min(GONGSUN_CRIT_DAMAGE_CAP)
                .max(crit_damage_before);
        }
        Ok(AbilityEffect::CritBuff {
            crit_gain: unit.crit_rate() - before,
            crit_rate: unit.crit_rate(),
            crit_damage_gain: unit.crit_damage - crit_damage_before,
            crit_damage: unit.crit_damage,
        })
    }

    fn sun_shangxiang(
        state: &mut MatchState,
        target: UnitId,
        passives: &mut Vec<PassiveEvent>,
    ) -> Result<AbilityEffect> {
        let unit = Self::unit_mut(state, target)?;
        let before = unit.armor;
        unit.armor = (unit.armor - SUN_ARMOR_SHRED).max(0);
        let armor_reduced = before - unit.armor;
        let target_armor = unit.armor;

        let hit = Self::strike(state, target, SUN_TRUE_DAMAGE, false, passives)?;
        Ok(AbilityEffect::ArmorShred {
            armor_reduced,
            target_armor,
            hit,
        })
    }

    fn yao(state: &mut MatchState, caster: UnitId, target: UnitId) -> Result<AbilityEffect> {
        let caster_health = state.require_unit(caster)?.health;
        let shield = YAO_SHIELD_BASE + scaled(caster_health, YAO_SHIELD_RATE);

        let unit = Self::unit_mut(state, target)?;
        unit.add_shield(shield);
        let crit_before = unit.crit_rate();
        unit.set_crit_rate(crit_before + YAO_CRIT_BUFF);
        unit.armor += YAO_ARMOR_BUFF;

        Ok(AbilityEffect::ShieldBuff {
            target,
            shield,
            crit_gain: unit.crit_rate() - crit_before,
            armor_gain: YAO_ARMOR_BUFF,
            target_shield: unit.shield,
            target_crit_rate: unit.crit_rate(),
            target_armor: unit.armor,
        })
    }

    fn da_qiao(
        state: &mut MatchState,
        rng: &mut impl RandomSource,
        caster: UnitId,
        passives: &mut Vec<PassiveEvent>,
    ) -> Result<AbilityEffect> {
        let unit = state.require_unit(caster)?;
        let base_damage = (unit.lost_health() + unit.attack).max(0) / DAQIAO_DIVISOR;
        let (crit_rate, crit_damage) = (unit.crit_rate(), unit.crit_damage);
        let enemies = Self::living(state, unit.faction.opponent());

        let mut hits = Vec::with_capacity(enemies.len());
        for enemy in enemies {
            let (damage, is_critical) = roll_crit(rng, base_damage, crit_rate, crit_damage);
            hits.push(Self::strike(state, enemy, damage, is_critical, passives)?);
        }
        Ok(AbilityEffect::AreaDamage { base_damage, hits })
    }

    fn shao_siyuan(
        state: &mut MatchState,
        rng: &mut impl RandomSource,
        caster: UnitId,
        target: UnitId,
        passives: &mut Vec<PassiveEvent>,
    ) -> Result<AbilityEffect> {
        let unit = state.require_unit(caster)?;
        let stolen_points = unit.flags.stolen_points.min(SHAO_POINT_CAP);
        let points = i64::from(stolen_points);
        let same_side = state.require_unit(target)?.faction == unit.faction;

        if same_side {
            let heal = Self::heal(state, target, SHAO_HEAL_BASE + points * SHAO_HEAL_PER_POINT)?;
            Ok(AbilityEffect::StolenHeal { stolen_points, heal })
        } else {
            let (damage, is_critical) = roll_crit(
                rng,
                SHAO_DAMAGE_BASE + points * SHAO_DAMAGE_PER_POINT,
                unit.crit_rate(),
                unit.crit_damage,
            );
            let hit = Self::strike(state, target, damage, is_critical, passives)?;
            Ok(AbilityEffect::StolenDamage { stolen_points, hit })
        }
    }

    /// `floor(attack * 0.3 + health_term * 0.2)`.
    fn blend(attack: i64, health_term: i64) -> i64 {
        (attack as f64 * YANG_ATTACK_RATE + health_term as f64 * YANG_HEALTH_RATE).floor() as i64
    }

    fn yang_yuhuan(
        state: &mut MatchState,
        rng: &mut impl RandomSource,
        caster: UnitId,
        passives: &mut Vec<PassiveEvent>,
    ) -> Result<AbilityEffect> {
        let unit = Self::unit_mut(state, caster)?;
        unit.flags.skill_used = true;
        let unit = state.require_unit(caster)?;
        let faction = unit.faction;

        if unit.health_fraction() >= YANG_THRESHOLD {
            let base_damage = Self::blend(unit.attack, unit.lost_health());
            let (crit_rate, crit_damage) = (unit.crit_rate(), unit.crit_damage);
            let mut hits = Vec::new();
            for enemy in Self::living(state, faction.opponent()) {
                let (damage, is_critical) = roll_crit(rng, base_damage, crit_rate, crit_damage);
                hits.push(Self::strike(state, enemy, damage, is_critical, passives)?);
            }
            Ok(AbilityEffect::AreaDamage { base_damage, hits })
        } else {
            let amount = Self::blend(unit.attack, unit.health);
            let mut heals = Vec::new();
            for ally in Self::living(state, faction) {
                heals.push(Self::heal(state, ally, amount)?);
            }
            Ok(AbilityEffect::AreaHeal { heals })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HeroCatalog;
    use crate::core::{FactionMap, RulesConfig, ScriptedRng};

    fn state(blue: &[HeroKind], red: &[HeroKind]) -> MatchState {
        let catalog = HeroCatalog::builtin();
        let rosters = FactionMap::new(|faction| {
            let kinds = if faction == Faction::Blue { blue } else { red };
            kinds.iter().map(|&kind| catalog.get(kind).unwrap()).collect()
        });
        MatchState::new(RulesConfig::default(), &rosters)
    }

    fn cast(state: &mut MatchState, caster: u32, target: Option<u32>) -> Result<AbilityOutcome> {
        AbilityResolver::resolve(state, &mut ScriptedRng::never(), UnitId(caster), target.map(UnitId))
    }

    #[test]
    fn test_dolia_heal_reports_clamped_amount() {
        let mut state = state(&[HeroKind::Dolia, HeroKind::Lan], &[HeroKind::Yao]);
        state.unit_mut(UnitId(2)).unwrap().health = 650;
        let outcome = cast(&mut state, 1, Some(2)).unwrap();
        assert_eq!(
            outcome.effect,
            AbilityEffect::Heal {
                heal: AbilityHeal { target: UnitId(2), amount: 50, target_health: 700 }
            }
        );
    }

    #[test]
    fn test_dolia_rejects_enemy_and_missing_target() {
        let mut state = state(&[HeroKind::Dolia], &[HeroKind::Yao]);
        assert_eq!(
            cast(&mut state, 1, Some(2)).unwrap_err(),
            ArenaError::InvalidTarget { actor: UnitId(1), target: UnitId(2) }
        );
        assert_eq!(cast(&mut state, 1, None).unwrap_err(), ArenaError::TargetNotFound(None));
        assert_eq!(cast(&mut state, 1, Some(8)).unwrap_err(), ArenaError::TargetNotFound(Some(UnitId(8))));
    }

    #[test]
    fn test_dead_caster() {
        let mut state = state(&[HeroKind::Lan], &[HeroKind::Yao]);
        state.unit_mut(UnitId(1)).unwrap().health = 0;
        assert_eq!(cast(&mut state, 1, None).unwrap_err(), ArenaError::CasterNotFound(UnitId(1)));
        assert_eq!(state.unit(UnitId(1)).unwrap().attack, 400);
    }

    #[test]
    fn test_lan_attack_buff() {
        let mut state = state(&[HeroKind::Lan], &[HeroKind::Yao]);
        let outcome = cast(&mut state, 1, None).unwrap();
        assert_eq!(outcome.effect, AbilityEffect::AttackBuff { amount: 100, attack: 500 });
        assert_eq!(outcome.caster_stats.attack, 500);
    }

    #[test]
    fn test_gongsun_crit_overflow() {
        let mut state = state(&[HeroKind::GongsunLi], &[HeroKind::Yao]);
        cast(&mut state, 1, None).unwrap();
        let unit = state.unit(UnitId(1)).unwrap();
        assert!((unit.crit_rate() - 0.6).abs() < 1e-9);
        assert_eq!(unit.crit_damage, 1.3);

        // 0.6 + 0.4 = 1.0, no overflow yet
        cast(&mut state, 1, None).unwrap();
        // 1.0 + 0.4: 0.4 overflow -> +0.2 crit damage
        let outcome = cast(&mut state, 1, None).unwrap();
        match outcome.effect {
            AbilityEffect::CritBuff { crit_rate, crit_damage, crit_damage_gain, .. } => {
                assert_eq!(crit_rate, 1.0);
                assert!((crit_damage - 1.5).abs() < 1e-9);
                assert!((crit_damage_gain - 0.2).abs() < 1e-9);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_gongsun_crit_damage_cap() {
        let mut state = state(&[HeroKind::GongsunLi], &[HeroKind::Yao]);
        for _ in 0..10 {
            cast(&mut state, 1, None).unwrap();
        }
        assert_eq!(state.unit(UnitId(1)).unwrap().crit_damage, 2.0);
    }

    #[test]
    fn test_sun_shangxiang_shred_then_true_damage() {
        let mut state = state(&[HeroKind::SunShangxiang], &[HeroKind::Yao]);
        state.unit_mut(UnitId(2)).unwrap().shield = 50;
        let outcome = cast(&mut state, 1, Some(2)).unwrap();
        match outcome.effect {
            AbilityEffect::ArmorShred { armor_reduced, target_armor, hit } => {
                assert_eq!(armor_reduced, 60);
                assert_eq!(target_armor, 140);
                assert_eq!(hit.damage, 75);
                assert_eq!(hit.target_shield, 0);
                assert_eq!(hit.target_health, 825);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_overkill_reports_applied_damage() {
        let mut state = state(&[HeroKind::SunShangxiang], &[HeroKind::Yao]);
        state.unit_mut(UnitId(2)).unwrap().health = 20;
        let outcome = cast(&mut state, 1, Some(2)).unwrap();
        match outcome.effect {
            AbilityEffect::ArmorShred { hit, .. } => {
                assert_eq!(hit.damage, 20);
                assert_eq!(hit.health_loss, 20);
                assert_eq!(hit.absorbed, 0);
                assert_eq!(hit.target_health, 0);
                assert!(hit.target_dead);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_sun_shangxiang_armor_floor() {
        let mut state = state(&[HeroKind::SunShangxiang], &[HeroKind::Yao]);
        state.unit_mut(UnitId(2)).unwrap().armor = 20;
        cast(&mut state, 1, Some(2)).unwrap();
        assert_eq!(state.unit(UnitId(2)).unwrap().armor, 0);
    }

    #[test]
    fn test_yao_shield_buff() {
        let mut state = state(&[HeroKind::Yao, HeroKind::Lan], &[HeroKind::Dolia]);
        state.unit_mut(UnitId(1)).unwrap().health = 805;
        let outcome = cast(&mut state, 1, Some(2)).unwrap();
        match outcome.effect {
            AbilityEffect::ShieldBuff { shield, target_crit_rate, target_armor, .. } => {
                assert_eq!(shield, 250);
                assert!((target_crit_rate - 0.18).abs() < 1e-9);
                assert_eq!(target_armor, 275);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_da_qiao_area_damage() {
        let mut state = state(&[HeroKind::DaQiao], &[HeroKind::Lan, HeroKind::Yao, HeroKind::Dolia]);
        state.unit_mut(UnitId(1)).unwrap().health = 600;
        state.unit_mut(UnitId(3)).unwrap().health = 0;
        // crit on the first living enemy only
        let mut rng = ScriptedRng::new(vec![0.0, 0.9]);
        let outcome = AbilityResolver::resolve(&mut state, &mut rng, UnitId(1), None).unwrap();
        match outcome.effect {
            AbilityEffect::AreaDamage { base_damage, hits } => {
                // (200 + 300) / 5
                assert_eq!(base_damage, 100);
                assert_eq!(hits.len(), 2);
                assert_eq!((hits[0].target, hits[0].damage, hits[0].is_critical), (UnitId(2), 130, true));
                assert_eq!((hits[1].target, hits[1].damage, hits[1].is_critical), (UnitId(4), 100, false));
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_shao_siyuan_branches() {
        let mut state = state(&[HeroKind::ShaoSiyuan, HeroKind::Lan], &[HeroKind::Yao]);
        state.unit_mut(UnitId(1)).unwrap().flags.stolen_points = 3;
        state.unit_mut(UnitId(2)).unwrap().health = 300;

        let heal = cast(&mut state, 1, Some(2)).unwrap();
        assert_eq!(
            heal.effect,
            AbilityEffect::StolenHeal {
                stolen_points: 3,
                heal: AbilityHeal { target: UnitId(2), amount: 220, target_health: 520 },
            }
        );

        let damage = cast(&mut state, 1, Some(3)).unwrap();
        match damage.effect {
            AbilityEffect::StolenDamage { stolen_points, hit } => {
                assert_eq!(stolen_points, 3);
                assert_eq!(hit.damage, 300);
                assert_eq!(hit.target_health, 550);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_yang_yuhuan_damage_branch() {
        let mut state = state(&[HeroKind::YangYuhuan], &[HeroKind::Lan, HeroKind::Yao]);
        state.unit_mut(UnitId(1)).unwrap().health = 400;
        let outcome = cast(&mut state, 1, None).unwrap();
        match outcome.effect {
            AbilityEffect::AreaDamage { base_damage, hits } => {
                // 120 + 60
                assert_eq!(base_damage, 180);
                assert_eq!(hits.len(), 2);
            }
            other => panic!("unexpected effect {other:?}"),
        }
        assert!(state.unit(UnitId(1)).unwrap().flags.skill_used);
    }

    #[test]
    fn test_yang_yuhuan_heal_branch() {
        let mut state = state(&[HeroKind::YangYuhuan, HeroKind::Lan], &[HeroKind::Yao]);
        state.unit_mut(UnitId(1)).unwrap().health = 300;
        state.unit_mut(UnitId(2)).unwrap().health = 650;
        let outcome = cast(&mut state, 1, None).unwrap();
        // 120 + 60 = 180 each, Lan clamps at 50
        assert_eq!(
            outcome.effect,
            AbilityEffect::AreaHeal {
                heals: vec![
                    AbilityHeal { target: UnitId(1), amount: 180, target_health: 480 },
                    AbilityHeal { target: UnitId(2), amount: 50, target_health: 700 },
                ]
            }
        );
        assert_eq!(state.unit(UnitId(3)).unwrap().health, 850);
    }

    #[test]
    fn test_ability_kill_and_last_stand() {
        let mut state = state(&[HeroKind::SunShangxiang], &[HeroKind::DaQiao, HeroKind::Yao]);
        state.unit_mut(UnitId(2)).unwrap().health = 20;
        state.unit_mut(UnitId(3)).unwrap().health = 20;

        let outcome = cast(&mut state, 1, Some(2)).unwrap();
        assert!(outcome.killed().is_empty());
        assert!(matches!(outcome.passives[0], PassiveEvent::LastStand { .. }));

        let outcome = cast(&mut state, 1, Some(3)).unwrap();
        assert_eq!(outcome.killed(), vec![UnitId(3)]);
    }

    #[test]
    fn test_effect_type_tag() {
        let mut state = state(&[HeroKind::Lan], &[HeroKind::Yao]);
        let outcome = cast(&mut state, 1, None).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["effect_type"], "attack_buff");
        assert_eq!(json["hero"], "lan");
    }
}
