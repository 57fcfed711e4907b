//! Basic attacks, damage application and hero passives.

pub mod damage;
pub mod passives;
pub mod outcome;
pub mod resolver;

pub use damage::{absorb, base_damage, deal_damage, DamageReport};
pub use outcome::{AmplifyStep, AttackOutcome};
pub use passives::PassiveEvent;
pub use resolver::CombatResolver;
