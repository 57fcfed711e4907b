//! # hero-duel
//!
//! A server-authoritative, turn-based 3v3 hero battle engine.
//!
//! ## Design Principles
//!
//! 1. **Server Authority**: Clients only send intents. Every formula, roll and
//!    resource change is computed here and broadcast as an outcome.
//!
//! 2. **Atomic Actions**: An action either applies completely or not at all.
//!    Rejections leave state, draft and RNG untouched.
//!
//! 3. **Injected Randomness**: All rolls go through `RandomSource`, so a seeded
//!    `GameRng` replays a match and a `ScriptedRng` pins exact outcomes in tests.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Rosters are `im::Vector`s. Checkpointing a
//!   match before each action is an O(1) clone.
//!
//! - **Closed Hero Set**: Hero behavior dispatches on `HeroKind`. Catalog
//!   tables only carry numbers.
//!
//! - **Single-Threaded Rooms**: A `Session` owns one match. Hosting code
//!   serializes requests per room; sessions are `Send`.
//!
//! ## Modules
//!
//! - `core`: Factions, units, state, actions, RNG, configuration, errors
//! - `catalog`: Hero, equipment and recipe tables
//! - `economy`: Gold ledger, bounded counters, turn income
//! - `equipment`: Equip/unequip and crafting
//! - `combat`: Damage formula, passives, basic attack resolution
//! - `abilities`: Per-hero active abilities
//! - `turn`: Turn order, action budget, turn-boundary effects
//! - `session`: Draft, action routing, outbound events, termination

pub mod core;
pub mod catalog;
pub mod economy;
pub mod equipment;
pub mod combat;
pub mod abilities;
pub mod turn;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Faction, FactionMap, Seat,
    Unit, UnitId, UnitStats,
    GameRng, RandomSource, ScriptedRng,
    MatchConfig, RulesConfig, TeamSize,
    ArenaError, ErrorKind, Result,
    ActionKind, ActionRecord, ActionRequest,
    MatchState, Phase,
};

pub use crate::catalog::{
    Catalogs, HeroCatalog, HeroDefinition, HeroKind,
    EquipmentCatalog, EquipmentItem, EffectKind, ItemEffect,
    Recipe, RecipeBook,
};

pub use crate::economy::{BoundedCounter, EconomyLedger, TurnIncome};

pub use crate::equipment::{CraftOutcome, EquipmentSystem};

pub use crate::combat::{AttackOutcome, CombatResolver, PassiveEvent};

pub use crate::abilities::{AbilityEffect, AbilityOutcome, AbilityResolver};

pub use crate::turn::{TurnChange, TurnScheduler};

pub use crate::session::{
    Audience, FullState, GameOverReason, Outbound, ResourceSnapshot, ServerEvent, Session,
};
