//! Match state: the aggregate root mutated by every resolver.
//!
//! ## Layout
//!
//! - Two `FactionState`s, each with its roster and per-faction counters
//! - The `EconomyLedger` (gold and ultimate charge)
//! - Turn counter and phase
//! - Accepted-action log
//!
//! Rosters are `im::Vector`s, so cloning a `MatchState` is O(1). The session
//! takes a clone before every action and restores it when the action is
//! rejected.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::{ActionKind, ActionRecord, ArenaError, Faction, FactionMap, Result, RulesConfig, Unit, UnitId};
use crate::catalog::{EquipmentItem, HeroDefinition};
use crate::economy::{BoundedCounter, EconomyLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Picking,
    Playing,
    Over,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Picking => write!(f, "picking"),
            Phase::Playing => write!(f, "playing"),
            Phase::Over => write!(f, "over"),
        }
    }
}

/// One side's roster and counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactionState {
    pub units: Vector<Unit>,
    pub skill_points: BoundedCounter,
    /// Attacks and ability uses spent this turn.
    pub actions_used: u32,
    /// Death compensation already granted.
    pub compensated: bool,
    /// Items drawn by the last purchase and not yet equipped.
    pub pending_offer: Vec<EquipmentItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub factions: FactionMap<FactionState>,
    pub ledger: EconomyLedger,
    /// Starts at 1. Odd turns belong to blue.
    pub turn: u32,
    pub phase: Phase,
    pub winner: Option<Faction>,
    pub rules: RulesConfig,
    pub history: Vector<ActionRecord>,
    next_sequence: u32,
}

impl MatchState {
    /// Field both rosters at full health. Blue units get the lower ids.
    pub fn new(rules: RulesConfig, rosters: &FactionMap<Vec<HeroDefinition>>) -> Self {
        let mut next_id = 1;
        let factions = FactionMap::new(|faction| {
            let units: Vector<Unit> = rosters[faction]
                .iter()
                .map(|definition| {
                    let unit = Unit::from_definition(UnitId::new(next_id), faction, definition);
                    next_id += 1;
                    unit
                })
                .collect();
            FactionState {
                units,
                skill_points: BoundedCounter::new(rules.starting_skill_points, rules.skill_point_cap),
                actions_used: 0,
                compensated: false,
                pending_offer: Vec::new(),
            }
        });

        Self {
            factions,
            ledger: EconomyLedger::new(rules),
            turn: 1,
            phase: Phase::Playing,
            winner: None,
            rules,
            history: Vector::new(),
            next_sequence: 0,
        }
    }

    /// Faction whose turn it is.
    #[must_use]
    pub fn active_faction(&self) -> Faction {
        Faction::for_turn(self.turn)
    }

    fn locate(&self, id: UnitId) -> Option<(Faction, usize)> {
        Faction::ALL.into_iter().find_map(|faction| {
            self.factions[faction]
                .units
                .iter()
                .position(|unit| unit.id == id)
                .map(|index| (faction, index))
        })
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        let (faction, index) = self.locate(id)?;
        self.factions[faction].units.get(index)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        let (faction, index) = self.locate(id)?;
        self.factions[faction].units.get_mut(index)
    }

    /// Look up a unit, failing with `UnitNotFound`.
    pub fn require_unit(&self, id: UnitId) -> Result<&Unit> {
        self.unit(id).ok_or(ArenaError::UnitNotFound(id))
    }

    pub fn units(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.factions[faction].units.iter()
    }

    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        Faction::ALL.into_iter().flat_map(move |faction| self.units(faction))
    }

    /// Ids of living units, in roster order.
    #[must_use]
    pub fn living(&self, faction: Faction) -> Vec<UnitId> {
        self.units(faction)
            .filter(|unit| unit.is_alive())
            .map(|unit| unit.id)
            .collect()
    }

    #[must_use]
    pub fn living_count(&self, faction: Faction) -> usize {
        self.units(faction).filter(|unit| unit.is_alive()).count()
    }

    #[must_use]
    pub fn dead_count(&self, faction: Faction) -> usize {
        self.units(faction).filter(|unit| !unit.is_alive()).count()
    }

    /// Living unit with the lowest absolute health. Ties go to roster order.
    #[must_use]
    pub fn lowest_health_ally(&self, faction: Faction, exclude: Option<UnitId>) -> Option<UnitId> {
        self.units(faction)
            .filter(|unit| unit.is_alive() && Some(unit.id) != exclude)
            .min_by_key(|unit| unit.health)
            .map(|unit| unit.id)
    }

    #[must_use]
    pub fn skill_points(&self, faction: Faction) -> BoundedCounter {
        self.factions[faction].skill_points
    }

    /// Append an accepted action to the log.
    pub fn record(&mut self, faction: Faction, kind: ActionKind) {
        let record = ActionRecord {
            sequence: self.next_sequence,
            turn: self.turn,
            faction,
            kind,
        };
        self.next_sequence += 1;
        self.history.push_back(record);
    }

    /// Unit, counter and ledger invariants.
    pub fn check_invariants(&self) -> Result<()> {
        for unit in self.all_units() {
            if unit.health < 0 || unit.health > unit.max_health {
                return Err(ArenaError::InternalConsistency(format!(
                    "{} health {} outside 0..={}",
                    unit.id, unit.health, unit.max_health
                )));
            }
            if unit.shield < 0 {
                return Err(ArenaError::InternalConsistency(format!(
                    "{} shield is {}",
                    unit.id, unit.shield
                )));
            }
            if !(0.0..=1.0).contains(&unit.crit_rate()) {
                return Err(ArenaError::InternalConsistency(format!(
                    "{} crit rate is {}",
                    unit.id,
                    unit.crit_rate()
                )));
            }
        }
        for (faction, side) in self.factions.iter() {
            if side.actions_used > self.rules.action_budget {
                return Err(ArenaError::InternalConsistency(format!(
                    "{faction} used {} actions with a budget of {}",
                    side.actions_used, self.rules.action_budget
                )));
            }
            if side.skill_points.value() > side.skill_points.cap() {
                return Err(ArenaError::InternalConsistency(format!(
                    "{faction} skill points exceed cap"
                )));
            }
        }
        self.ledger.check_invariants()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{HeroCatalog, HeroKind};

    fn state() -> MatchState {
        let catalog = HeroCatalog::builtin();
        let rosters = FactionMap::new(|faction| {
            let kinds = match faction {
                Faction::Blue => [HeroKind::Dolia, HeroKind::Lan, HeroKind::Yao],
                Faction::Red => [HeroKind::DaQiao, HeroKind::GongsunLi, HeroKind::ShaoSiyuan],
            };
            kinds.iter().map(|&kind| catalog.get(kind).unwrap()).collect()
        });
        MatchState::new(RulesConfig::default(), &rosters)
    }

    #[test]
    fn test_new_match() {
        let state = state();
        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.active_faction(), Faction::Blue);
        assert_eq!(state.living(Faction::Blue), vec![UnitId(1), UnitId(2), UnitId(3)]);
        assert_eq!(state.living(Faction::Red), vec![UnitId(4), UnitId(5), UnitId(6)]);
        assert_eq!(state.skill_points(Faction::Red).value(), 4);
        assert_eq!(state.ledger.balance(Faction::Blue), 10);
    }

    #[test]
    fn test_unit_lookup() {
        let mut state = state();
        assert_eq!(state.unit(UnitId(5)).unwrap().hero, HeroKind::GongsunLi);
        assert!(state.unit(UnitId(99)).is_none());
        assert_eq!(state.require_unit(UnitId(99)).unwrap_err(), ArenaError::UnitNotFound(UnitId(99)));

        state.unit_mut(UnitId(2)).unwrap().attack = 1;
        assert_eq!(state.unit(UnitId(2)).unwrap().attack, 1);
    }

    #[test]
    fn test_lowest_health_ally() {
        let mut state = state();
        state.unit_mut(UnitId(1)).unwrap().health = 300;
        state.unit_mut(UnitId(3)).unwrap().health = 200;
        assert_eq!(state.lowest_health_ally(Faction::Blue, None), Some(UnitId(3)));
        assert_eq!(state.lowest_health_ally(Faction::Blue, Some(UnitId(3))), Some(UnitId(1)));

        state.unit_mut(UnitId(3)).unwrap().health = 0;
        assert_eq!(state.lowest_health_ally(Faction::Blue, None), Some(UnitId(1)));
        assert_eq!(state.dead_count(Faction::Blue), 1);
        assert_eq!(state.living_count(Faction::Blue), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = state();
        let mut copy = original.clone();
        copy.unit_mut(UnitId(1)).unwrap().health = 1;
        assert_eq!(original.unit(UnitId(1)).unwrap().health, 900);
    }

    #[test]
    fn test_record_sequence() {
        let mut state = state();
        state.record(Faction::Blue, ActionKind::EndTurn);
        state.record(Faction::Red, ActionKind::BuyEquipment);
        let sequences: Vec<_> = state.history.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![0, 1]);
    }

    #[test]
    fn test_invariant_violation_detected() {
        let mut state = state();
        assert!(state.check_invariants().is_ok());
        state.unit_mut(UnitId(4)).unwrap().shield = -5;
        assert!(state.check_invariants().unwrap_err().is_fatal());
    }
}
