//! Structured result of one basic attack.

use serde::{Deserialize, Serialize};

use super::passives::PassiveEvent;
use crate::core::{UnitId, UnitStats};

/// One damage-amplification step, in equipment order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmplifyStep {
    pub item_id: String,
    pub rate: f64,
    pub bonus: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker: UnitId,
    pub target: UnitId,
    /// Armor-reduced damage before bonuses.
    pub base_damage: i64,
    /// Damage actually applied (0 when dodged).
    pub damage: i64,
    /// Damage before the dodge check.
    pub original_damage: i64,
    pub amplifiers: Vec<AmplifyStep>,
    pub is_critical: bool,
    pub is_dodged: bool,
    pub absorbed: i64,
    pub target_health: i64,
    pub target_shield: i64,
    pub target_dead: bool,
    pub passives: Vec<PassiveEvent>,
    pub attacker_stats: UnitStats,
    pub target_stats: UnitStats,
}

impl AttackOutcome {
    /// Units that died in this exchange.
    #[must_use]
    pub fn killed(&self) -> Vec<UnitId> {
        if self.target_dead {
            vec![self.target]
        } else {
            Vec::new()
        }
    }
}
