//! Match configuration.
//!
//! - `RulesConfig`: economy and turn tunables (budgets, caps, gold amounts)
//! - `TeamSize`: 2v2 or 3v3
//! - `MatchConfig`: combines the above with the RNG seed
//!
//! Hero ability magnitudes are not configuration; they live next to the
//! ability and passive code that uses them.

use serde::{Deserialize, Serialize};

/// Economy and turn tunables.
///
/// ```
/// use hero_duel::core::RulesConfig;
///
/// let rules = RulesConfig::default().with_starting_gold(50).with_action_budget(4);
/// assert_eq!(rules.starting_gold, 50);
/// assert_eq!(rules.action_budget, 4);
/// assert_eq!(rules.kill_reward, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Attacks plus ability uses allowed per turn.
    pub action_budget: u32,
    pub skill_point_cap: u32,
    pub starting_skill_points: u32,
    /// Skill points accrue at turn start once the turn counter exceeds this.
    pub skill_point_accrual_after_turn: u32,
    pub ultimate_charge_cap: u32,
    pub starting_gold: i64,
    pub base_income: i64,
    /// Interest earned per gold held, before the cap.
    pub interest_rate: f64,
    pub interest_cap: i64,
    pub kill_reward: i64,
    pub death_compensation: i64,
    /// Deaths a faction must suffer before compensation is granted.
    pub compensation_deaths: usize,
    pub equipment_cost: i64,
    /// Items offered per equipment purchase.
    pub equipment_draw: usize,
    pub equipment_slots: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            action_budget: 3,
            skill_point_cap: 6,
            starting_skill_points: 4,
            skill_point_accrual_after_turn: 2,
            ultimate_charge_cap: 5,
            starting_gold: 10,
            base_income: 5,
            interest_rate: 0.10,
            interest_cap: 5,
            kill_reward: 20,
            death_compensation: 30,
            compensation_deaths: 2,
            equipment_cost: 15,
            equipment_draw: 3,
            equipment_slots: 2,
        }
    }
}

impl RulesConfig {
    #[must_use]
    pub fn with_action_budget(mut self, budget: u32) -> Self {
        self.action_budget = budget;
        self
    }

    #[must_use]
    pub fn with_starting_gold(mut self, gold: i64) -> Self {
        self.starting_gold = gold.max(0);
        self
    }

    #[must_use]
    pub fn with_starting_skill_points(mut self, points: u32) -> Self {
        self.starting_skill_points = points;
        self
    }

    #[must_use]
    pub fn with_income(mut self, base: i64, interest_rate: f64, interest_cap: i64) -> Self {
        self.base_income = base;
        self.interest_rate = interest_rate;
        self.interest_cap = interest_cap;
        self
    }

    #[must_use]
    pub fn with_kill_reward(mut self, reward: i64) -> Self {
        self.kill_reward = reward;
        self
    }

    #[must_use]
    pub fn with_death_compensation(mut self, amount: i64, deaths: usize) -> Self {
        self.death_compensation = amount;
        self.compensation_deaths = deaths;
        self
    }

    #[must_use]
    pub fn with_equipment_cost(mut self, cost: i64) -> Self {
        self.equipment_cost = cost;
        self
    }
}

/// Units per faction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSize {
    Duo,
    Trio,
}

impl TeamSize {
    #[must_use]
    pub const fn units(self) -> usize {
        match self {
            TeamSize::Duo => 2,
            TeamSize::Trio => 3,
        }
    }
}

/// Configuration for one room's match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub team_size: TeamSize,
    /// Seed for the match RNG.
    pub seed: u64,
    pub rules: RulesConfig,
}

impl MatchConfig {
    #[must_use]
    pub fn new(team_size: TeamSize, seed: u64) -> Self {
        Self {
            team_size,
            seed,
            rules: RulesConfig::default(),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(TeamSize::Trio, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = RulesConfig::default();
        assert_eq!(rules.action_budget, 3);
        assert_eq!(rules.skill_point_cap, 6);
        assert_eq!(rules.ultimate_charge_cap, 5);
        assert_eq!(rules.equipment_cost, 15);
        assert_eq!(rules.equipment_draw, 3);
        assert_eq!(rules.equipment_slots, 2);
    }

    #[test]
    fn test_starting_gold_never_negative() {
        let rules = RulesConfig::default().with_starting_gold(-5);
        assert_eq!(rules.starting_gold, 0);
    }

    #[test]
    fn test_team_size_units() {
        assert_eq!(TeamSize::Duo.units(), 2);
        assert_eq!(TeamSize::Trio.units(), 3);
        assert_eq!(MatchConfig::default().team_size, TeamSize::Trio);
    }

    #[test]
    fn test_config_serde() {
        let config = MatchConfig::new(TeamSize::Duo, 9)
            .with_rules(RulesConfig::default().with_kill_reward(25));
        let json = serde_json::to_string(&config).unwrap();
        let back: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
