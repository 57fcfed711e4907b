//! Hero active abilities.

pub mod outcome;
pub mod resolver;

pub use outcome::{AbilityEffect, AbilityHeal, AbilityHit, AbilityOutcome};
pub use resolver::AbilityResolver;
