//! Gold, skill points and ultimate charge.

pub mod counter;
pub mod ledger;

pub use counter::{BoundedCounter, CounterGain};
pub use ledger::{EconomyLedger, GoldReason, TurnIncome};
