//! Core engine types: factions, units, state, actions, RNG, configuration, errors.

pub mod faction;
pub mod unit;
pub mod rng;
pub mod config;
pub mod error;
pub mod action;
pub mod state;

pub use faction::{Faction, FactionMap, Seat};
pub use unit::{HealOverflow, HeroFlags, Unit, UnitId, UnitStats};
pub use rng::{GameRng, RandomSource, ScriptedRng};
pub use config::{MatchConfig, RulesConfig, TeamSize};
pub use error::{ArenaError, ErrorKind, Result};
pub use action::{ActionKind, ActionRecord, ActionRequest};
pub use state::{FactionState, MatchState, Phase};
