//! Error types for the battle engine.
//!
//! Every variant belongs to one [`ErrorKind`]. The first four kinds are caller
//! errors: the session rejects the action and leaves the match untouched.
//! `InternalConsistency` means a post-condition failed and the room is aborted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Faction, UnitId};
use crate::catalog::HeroKind;

/// Result type alias using [`ArenaError`].
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Error category reported alongside every rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EntityNotFound,
    IllegalTurnOrPhase,
    BudgetExceeded,
    EquipmentConstraintViolation,
    InternalConsistency,
}

/// Top-level error type for all engine operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ArenaError {
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Ability caster not found or not alive: {0}")]
    CasterNotFound(UnitId),

    #[error("Ability target not found or not alive")]
    TargetNotFound(Option<UnitId>),

    /// Target exists but is on the wrong side for this action.
    #[error("Invalid target {target} for {actor}")]
    InvalidTarget { actor: UnitId, target: UnitId },

    #[error("Hero not found in catalog: {0}")]
    HeroNotFound(String),

    #[error("Equipment not found: {0}")]
    EquipmentNotFound(String),

    #[error("Item {0} is not in the current equipment offer")]
    OfferItemNotFound(String),

    #[error("{faction} roster has no hero for pick {pick}")]
    IncompleteRoster { faction: Faction, pick: usize },

    #[error("It is not {0}'s pick")]
    WrongTurnOrSeat(Faction),

    #[error("Hero already taken: {0}")]
    HeroUnavailable(HeroKind),

    #[error("It is not {0}'s turn")]
    NotYourTurn(Faction),

    #[error("Action not allowed in the {0} phase")]
    WrongPhase(String),

    #[error("{faction} does not control {unit}")]
    NotUnitController { faction: Faction, unit: UnitId },

    #[error("Insufficient gold: need {required}, have {available}")]
    InsufficientGold { required: i64, available: i64 },

    #[error("Insufficient skill points: need {required}, have {available}")]
    InsufficientSkillPoints { required: u32, available: u32 },

    #[error("Action budget exhausted ({budget} per turn)")]
    ActionBudgetExhausted { budget: u32 },

    #[error("Ultimate not charged: {charge}/{cap}")]
    UltimateNotCharged { charge: u32, cap: u32 },

    #[error("Equipment slots full on {unit} ({slots} slots)")]
    EquipmentSlotsFull { unit: UnitId, slots: usize },

    #[error("{unit} does not hold materials {first} + {second}")]
    MaterialMismatch {
        unit: UnitId,
        first: String,
        second: String,
    },

    #[error("No recipe combines {first} + {second}")]
    RecipeNotFound { first: String, second: String },

    #[error("Failed to parse catalog: {0}")]
    CatalogFormat(String),

    #[error("Internal consistency violation: {0}")]
    InternalConsistency(String),
}

impl ArenaError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArenaError::UnitNotFound(_)
            | ArenaError::CasterNotFound(_)
            | ArenaError::TargetNotFound(_)
            | ArenaError::InvalidTarget { .. }
            | ArenaError::HeroNotFound(_)
            | ArenaError::IncompleteRoster { .. }
            | ArenaError::EquipmentNotFound(_)
            | ArenaError::OfferItemNotFound(_) => ErrorKind::EntityNotFound,
            ArenaError::WrongTurnOrSeat(_)
            | ArenaError::HeroUnavailable(_)
            | ArenaError::NotYourTurn(_)
            | ArenaError::WrongPhase(_)
            | ArenaError::NotUnitController { .. } => ErrorKind::IllegalTurnOrPhase,
            ArenaError::InsufficientGold { .. }
            | ArenaError::InsufficientSkillPoints { .. }
            | ArenaError::ActionBudgetExhausted { .. }
            | ArenaError::UltimateNotCharged { .. } => ErrorKind::BudgetExceeded,
            ArenaError::EquipmentSlotsFull { .. }
            | ArenaError::MaterialMismatch { .. }
            | ArenaError::RecipeNotFound { .. } => ErrorKind::EquipmentConstraintViolation,
            ArenaError::CatalogFormat(_) | ArenaError::InternalConsistency(_) => {
                ErrorKind::InternalConsistency
            }
        }
    }

    /// Stable wire code for failure events.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ArenaError::UnitNotFound(_) => "unit_not_found",
            ArenaError::CasterNotFound(_) => "caster_not_found",
            ArenaError::TargetNotFound(_) => "target_not_found",
            ArenaError::InvalidTarget { .. } => "invalid_target",
            ArenaError::HeroNotFound(_) => "hero_not_found",
            ArenaError::IncompleteRoster { .. } => "incomplete_roster",
            ArenaError::EquipmentNotFound(_) => "equipment_not_found",
            ArenaError::OfferItemNotFound(_) => "offer_item_not_found",
            ArenaError::WrongTurnOrSeat(_) => "wrong_turn_or_seat",
            ArenaError::HeroUnavailable(_) => "hero_unavailable",
            ArenaError::NotYourTurn(_) => "not_your_turn",
            ArenaError::WrongPhase(_) => "wrong_phase",
            ArenaError::NotUnitController { .. } => "not_unit_controller",
            ArenaError::InsufficientGold { .. } => "insufficient_gold",
            ArenaError::InsufficientSkillPoints { .. } => "insufficient_skill_points",
            ArenaError::ActionBudgetExhausted { .. } => "action_budget_exhausted",
            ArenaError::UltimateNotCharged { .. } => "ultimate_not_charged",
            ArenaError::EquipmentSlotsFull { .. } => "equipment_slots_full",
            ArenaError::MaterialMismatch { .. } => "material_mismatch",
            ArenaError::RecipeNotFound { .. } => "recipe_not_found",
            ArenaError::CatalogFormat(_) => "catalog_format",
            ArenaError::InternalConsistency(_) => "internal_consistency",
        }
    }

    /// Whether the error must abort the room.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::InternalConsistency
    }
}
