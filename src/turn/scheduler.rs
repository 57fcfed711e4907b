//! Turn order, per-turn action budget and turn-boundary income.
//!
//! ## Turn transition
//!
//! 1. increment the turn counter; parity picks the new active faction
//! 2. reset its action counter
//! 3. one skill point once the counter exceeds the accrual threshold
//! 4. base income plus interest
//! 5. start-of-turn passives for its living units

use serde::{Deserialize, Serialize};

use crate::combat::passives;
use crate::combat::PassiveEvent;
use crate::core::{ArenaError, Faction, MatchState, Phase, Result};
use crate::economy::TurnIncome;

/// Which counter an accepted action draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetedAction {
    Attack,
    Ability,
}

/// Everything that happened at a turn boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnChange {
    pub turn: u32,
    pub active: Faction,
    pub skill_points_gained: u32,
    pub skill_points: u32,
    pub income: TurnIncome,
    pub passives: Vec<PassiveEvent>,
}

pub struct TurnScheduler;

impl TurnScheduler {
    /// The match is in play and it is `faction`'s turn.
    pub fn check_turn(state: &MatchState, faction: Faction) -> Result<()> {
        if state.phase != Phase::Playing {
            return Err(ArenaError::WrongPhase(state.phase.to_string()));
        }
        if state.active_faction() != faction {
            return Err(ArenaError::NotYourTurn(faction));
        }
        Ok(())
    }

    /// Turn check plus a free slot in the action budget.
    pub fn check_action(state: &MatchState, faction: Faction) -> Result<()> {
        Self::check_turn(state, faction)?;
        let budget = state.rules.action_budget;
        if state.factions[faction].actions_used >= budget {
            return Err(ArenaError::ActionBudgetExhausted { budget });
        }
        Ok(())
    }

    /// Count an accepted attack or ability use. Ability uses also charge the ultimate.
    pub fn record_action(state: &mut MatchState, faction: Faction, action: BudgetedAction) {
        let side = &mut state.factions[faction];
        side.actions_used = (side.actions_used + 1).min(state.rules.action_budget);
        if action == BudgetedAction::Ability {
            let charge = state.ledger.charge_ultimate(faction);
            tracing::debug!(%faction, charge, "ultimate charged");
        }
    }

    /// Hand the turn to the other faction.
    pub fn end_turn(state: &mut MatchState) -> Result<TurnChange> {
        state.turn += 1;
        let active = state.active_faction();
        let accrue = state.turn > state.rules.skill_point_accrual_after_turn;

        let side = &mut state.factions[active];
        side.actions_used = 0;
        let skill_points_gained = if accrue { side.skill_points.add_capped(1).gained } else { 0 };
        let skill_points = side.skill_points.value();

        let income = state.ledger.turn_income(active)?;
        let passives = passives::start_of_turn(state, active);

        tracing::info!(
            turn = state.turn,
            faction = %active,
            skill_points,
            income = income.total,
            gold = income.balance,
            "turn started"
        );
        Ok(TurnChange {
            turn: state.turn,
            active,
            skill_points_gained,
            skill_points,
            income,
            passives,
        })
    }

    /// Spend a full ultimate charge and end the turn.
    pub fn use_ultimate(state: &mut MatchState, faction: Faction) -> Result<TurnChange> {
        Self::check_turn(state, faction)?;
        state.ledger.spend_ultimate(faction)?;
        tracing::info!(%faction, "ultimate used");
        Self::end_turn(state)
    }
}
