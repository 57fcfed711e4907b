//! Turn scheduling.

pub mod scheduler;

pub use scheduler::{BudgetedAction, TurnChange, TurnScheduler};
