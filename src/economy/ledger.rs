//! Per-faction gold and ultimate charge.
//!
//! All gold mutations go through [`EconomyLedger::credit`] and
//! [`EconomyLedger::debit`]. Both re-check the balance invariant afterwards; a
//! negative balance is an internal consistency failure, not a caller error.

use serde::{Deserialize, Serialize};

use super::BoundedCounter;
use crate::core::{ArenaError, Faction, FactionMap, Result, RulesConfig};

/// Why gold moved. Carried into logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldReason {
    KillReward,
    DeathCompensation,
    TurnIncome,
    EquipmentPurchase,
    Crafting,
}

/// Breakdown of one turn's income.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnIncome {
    pub base: i64,
    pub interest: i64,
    pub total: i64,
    pub balance: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomyLedger {
    gold: FactionMap<i64>,
    ultimate: FactionMap<BoundedCounter>,
    rules: RulesConfig,
}

impl EconomyLedger {
    #[must_use]
    pub fn new(rules: RulesConfig) -> Self {
        Self {
            gold: FactionMap::with_value(rules.starting_gold.max(0)),
            ultimate: FactionMap::with_value(BoundedCounter::new(0, rules.ultimate_charge_cap)),
            rules,
        }
    }

    #[must_use]
    pub fn balance(&self, faction: Faction) -> i64 {
        self.gold[faction]
    }

    /// Add gold. Returns the new balance.
    pub fn credit(&mut self, faction: Faction, amount: i64, reason: GoldReason) -> Result<i64> {
        if amount < 0 {
            return Err(ArenaError::InternalConsistency(format!(
                "negative credit of {amount} to {faction} ({reason:?})"
            )));
        }
        self.gold[faction] += amount;
        tracing::debug!(%faction, amount, ?reason, balance = self.gold[faction], "gold credited");
        self.check_invariants()?;
        Ok(self.gold[faction])
    }

    /// Remove gold, all or nothing. Returns the new balance.
    pub fn debit(&mut self, faction: Faction, amount: i64, reason: GoldReason) -> Result<i64> {
        if amount < 0 {
            return Err(ArenaError::InternalConsistency(format!(
                "negative debit of {amount} from {faction} ({reason:?})"
            )));
        }
        let available = self.gold[faction];
        if available < amount {
            return Err(ArenaError::InsufficientGold {
                required: amount,
                available,
            });
        }
        self.gold[faction] -= amount;
        tracing::debug!(%faction, amount, ?reason, balance = self.gold[faction], "gold debited");
        self.check_invariants()?;
        Ok(self.gold[faction])
    }

    pub fn kill_reward(&mut self, faction: Faction) -> Result<i64> {
        self.credit(faction, self.rules.kill_reward, GoldReason::KillReward)
    }

    pub fn death_compensation(&mut self, faction: Faction) -> Result<i64> {
        self.credit(faction, self.rules.death_compensation, GoldReason::DeathCompensation)
    }

    /// Interest on the current balance, capped.
    #[must_use]
    pub fn interest(&self, faction: Faction) -> i64 {
        let raw = (self.gold[faction] as f64 * self.rules.interest_rate).floor() as i64;
        raw.clamp(0, self.rules.interest_cap)
    }

    /// Credit base income plus interest.
    ///
    /// ```
    /// use hero_duel::core::{Faction, RulesConfig};
    /// use hero_duel::economy::EconomyLedger;
    ///
    /// let mut ledger = EconomyLedger::new(RulesConfig::default().with_starting_gold(40));
    /// let income = ledger.turn_income(Faction::Blue).unwrap();
    /// assert_eq!((income.interest, income.total, income.balance), (4, 9, 49));
    /// ```
    pub fn turn_income(&mut self, faction: Faction) -> Result<TurnIncome> {
        let base = self.rules.base_income;
        let interest = self.interest(faction);
        let total = base + interest;
        let balance = self.credit(faction, total, GoldReason::TurnIncome)?;
        Ok(TurnIncome {
            base,
            interest,
            total,
            balance,
        })
    }

    #[must_use]
    pub fn equipment_purchase_cost(&self) -> i64 {
        self.rules.equipment_cost
    }

    pub fn purchase_equipment(&mut self, faction: Faction) -> Result<i64> {
        self.debit(faction, self.rules.equipment_cost, GoldReason::EquipmentPurchase)
    }

    pub fn pay_craft_cost(&mut self, faction: Faction, cost: i64) -> Result<i64> {
        self.debit(faction, cost, GoldReason::Crafting)
    }

    #[must_use]
    pub fn ultimate_charge(&self, faction: Faction) -> BoundedCounter {
        self.ultimate[faction]
    }

    /// Add one ultimate charge, capped. Returns the new charge.
    pub fn charge_ultimate(&mut self, faction: Faction) -> u32 {
        self.ultimate[faction].add_capped(1);
        self.ultimate[faction].value()
    }

    /// Consume a full ultimate charge.
    pub fn spend_ultimate(&mut self, faction: Faction) -> Result<()> {
        let counter = self.ultimate[faction];
        if !counter.is_full() {
            return Err(ArenaError::UltimateNotCharged {
                charge: counter.value(),
                cap: counter.cap(),
            });
        }
        self.ultimate[faction].reset();
        Ok(())
    }

    /// Every balance is non-negative and every charge within its cap.
    pub fn check_invariants(&self) -> Result<()> {
        for (faction, &gold) in self.gold.iter() {
            if gold < 0 {
                return Err(ArenaError::InternalConsistency(format!(
                    "{faction} gold balance is {gold}"
                )));
            }
        }
        for (faction, counter) in self.ultimate.iter() {
            if counter.value() > counter.cap() {
                return Err(ArenaError::InternalConsistency(format!(
                    "{faction} ultimate charge {} exceeds cap {}",
                    counter.value(),
                    counter.cap()
                )));
            }
        }
        Ok(())
    }
}
