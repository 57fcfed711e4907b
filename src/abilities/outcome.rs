//! Structured ability results, tagged by `effect_type`.
//!
//! Every amount is what was actually applied after clamping, not what the
//! formula asked for.

use serde::{Deserialize, Serialize};

use crate::catalog::HeroKind;
use crate::combat::PassiveEvent;
use crate::core::{UnitId, UnitStats};

/// Damage dealt to one unit by an ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityHit {
    pub target: UnitId,
    /// Shield absorbed plus health lost.
    pub damage: i64,
    pub absorbed: i64,
    pub health_loss: i64,
    pub is_critical: bool,
    pub target_health: i64,
    pub target_shield: i64,
    pub target_dead: bool,
}

/// Health restored to one unit by an ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityHeal {
    pub target: UnitId,
    pub amount: i64,
    pub target_health: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect_type", rename_all = "snake_case")]
pub enum AbilityEffect {
    Heal {
        heal: AbilityHeal,
    },
    AttackBuff {
        amount: i64,
        attack: i64,
    },
    CritBuff {
        crit_gain: f64,
        crit_rate: f64,
        crit_damage_gain: f64,
        crit_damage: f64,
    },
    ArmorShred {
        armor_reduced: i64,
        target_armor: i64,
        hit: AbilityHit,
    },
    ShieldBuff {
        target: UnitId,
        shield: i64,
        crit_gain: f64,
        armor_gain: i64,
        target_shield: i64,
        target_crit_rate: f64,
        target_armor: i64,
    },
    AreaDamage {
        base_damage: i64,
        hits: Vec<AbilityHit>,
    },
    StolenHeal {
        stolen_points: u32,
        heal: AbilityHeal,
    },
    StolenDamage {
        stolen_points: u32,
        hit: AbilityHit,
    },
    AreaHeal {
        heals: Vec<AbilityHeal>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityOutcome {
    pub caster: UnitId,
    pub hero: HeroKind,
    #[serde(flatten)]
    pub effect: AbilityEffect,
    pub passives: Vec<PassiveEvent>,
    pub caster_stats: UnitStats,
}

impl AbilityOutcome {
    /// Units that died to this ability.
    #[must_use]
    pub fn killed(&self) -> Vec<UnitId> {
        let hits: Vec<&AbilityHit> = match &self.effect {
            AbilityEffect::ArmorShred { hit, .. } | AbilityEffect::StolenDamage { hit, .. } => vec![hit],
            AbilityEffect::AreaDamage { hits, .. } => hits.iter().collect(),
            _ => Vec::new(),
        };
        hits.into_iter()
            .filter(|hit| hit.target_dead)
            .map(|hit| hit.target)
            .collect()
    }
}
