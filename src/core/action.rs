//! Inbound action requests and the accepted-action log.
//!
//! The transport layer authenticates the sender and tags each request with the
//! acting faction; the engine trusts nothing else about it.

use serde::{Deserialize, Serialize};

use super::{Faction, UnitId};
use crate::catalog::HeroKind;

/// The verb of an inbound request.
///
/// ```
/// use hero_duel::core::{ActionKind, UnitId};
///
/// let json = r#"{ "action": "attack", "attacker": 1, "target": 4 }"#;
/// let kind: ActionKind = serde_json::from_str(json).unwrap();
/// assert_eq!(kind, ActionKind::Attack { attacker: UnitId::new(1), target: UnitId::new(4) });
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionKind {
    PickHero {
        hero: HeroKind,
    },
    Attack {
        attacker: UnitId,
        target: UnitId,
    },
    Skill {
        caster: UnitId,
        #[serde(default)]
        target: Option<UnitId>,
    },
    UseUltimate,
    EndTurn,
    BuyEquipment,
    EquipItem {
        item_id: String,
        unit: UnitId,
    },
    CraftEquipment {
        unit: UnitId,
        first: String,
        second: String,
    },
    RequestState,
}

impl ActionKind {
    /// Short name for logs and the action log.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::PickHero { .. } => "pick_hero",
            ActionKind::Attack { .. } => "attack",
            ActionKind::Skill { .. } => "skill",
            ActionKind::UseUltimate => "use_ultimate",
            ActionKind::EndTurn => "end_turn",
            ActionKind::BuyEquipment => "buy_equipment",
            ActionKind::EquipItem { .. } => "equip_item",
            ActionKind::CraftEquipment { .. } => "craft_equipment",
            ActionKind::RequestState => "request_state",
        }
    }
}

/// One authenticated request from a faction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub faction: Faction,
    #[serde(flatten)]
    pub kind: ActionKind,
}

impl ActionRequest {
    #[must_use]
    pub fn new(faction: Faction, kind: ActionKind) -> Self {
        Self { faction, kind }
    }
}

/// An accepted action, appended to the match log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Monotonic sequence number within the match.
    pub sequence: u32,
    pub turn: u32,
    pub faction: Faction,
    pub kind: ActionKind,
}
