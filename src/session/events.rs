//! Outbound events and state snapshots.
//!
//! Accepted actions are broadcast to both factions with the full resource
//! snapshot; rejections go to the sender only.

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityOutcome;
use crate::catalog::{EquipmentItem, HeroKind};
use crate::combat::AttackOutcome;
use crate::core::{Faction, FactionMap, MatchState, Phase, Unit, UnitId, UnitStats};
use crate::equipment::CraftOutcome;
use crate::turn::TurnChange;

/// Who receives an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Only(Faction),
    Both,
}

impl Audience {
    #[must_use]
    pub fn includes(self, faction: Faction) -> bool {
        match self {
            Audience::Only(target) => target == faction,
            Audience::Both => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outbound {
    pub to: Audience,
    pub event: ServerEvent,
}

impl Outbound {
    #[must_use]
    pub fn both(event: ServerEvent) -> Self {
        Self { to: Audience::Both, event }
    }

    #[must_use]
    pub fn only(faction: Faction, event: ServerEvent) -> Self {
        Self {
            to: Audience::Only(faction),
            event,
        }
    }
}

/// One faction's counters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactionResources {
    pub gold: i64,
    pub skill_points: u32,
    pub ultimate_charge: u32,
    pub actions_used: u32,
    pub actions_remaining: u32,
}

/// Post-action resources for both factions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub turn: u32,
    pub active: Faction,
    pub factions: FactionMap<FactionResources>,
}

impl ResourceSnapshot {
    #[must_use]
    pub fn capture(state: &MatchState) -> Self {
        let budget = state.rules.action_budget;
        Self {
            turn: state.turn,
            active: state.active_faction(),
            factions: state.factions.map(|faction, side| FactionResources {
                gold: state.ledger.balance(faction),
                skill_points: side.skill_points.value(),
                ultimate_charge: state.ledger.ultimate_charge(faction).value(),
                actions_used: side.actions_used,
                actions_remaining: budget.saturating_sub(side.actions_used),
            }),
        }
    }
}

/// Complete serialized view of one faction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactionView {
    pub units: Vec<Unit>,
    pub resources: FactionResources,
    pub compensated: bool,
    pub pending_offer: Vec<EquipmentItem>,
}

/// Reconciliation snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FullState {
    pub phase: Phase,
    pub turn: u32,
    pub active: Option<Faction>,
    pub winner: Option<Faction>,
    /// Picks so far while drafting; full rosters once play starts.
    pub picks: FactionMap<Vec<HeroKind>>,
    pub factions: Option<FactionMap<FactionView>>,
}

impl FullState {
    #[must_use]
    pub fn capture(state: &MatchState, picks: &FactionMap<Vec<HeroKind>>) -> Self {
        let resources = ResourceSnapshot::capture(state);
        Self {
            phase: state.phase,
            turn: state.turn,
            active: Some(state.active_faction()),
            winner: state.winner,
            picks: picks.clone(),
            factions: Some(state.factions.map(|faction, side| FactionView {
                units: side.units.iter().cloned().collect(),
                resources: resources.factions[faction],
                compensated: side.compensated,
                pending_offer: side.pending_offer.clone(),
            })),
        }
    }

    #[must_use]
    pub fn drafting(picks: &FactionMap<Vec<HeroKind>>) -> Self {
        Self {
            phase: Phase::Picking,
            turn: 0,
            active: None,
            winner: None,
            picks: picks.clone(),
            factions: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    Elimination,
    Forfeit,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    HeroPicked {
        faction: Faction,
        hero: HeroKind,
        next_picker: Option<Faction>,
    },
    MatchStarted {
        state: FullState,
    },
    AttackResolved {
        faction: Faction,
        outcome: AttackOutcome,
        resources: ResourceSnapshot,
    },
    SkillResolved {
        faction: Faction,
        skill_cost: u32,
        outcome: AbilityOutcome,
        resources: ResourceSnapshot,
    },
    UltimateUsed {
        faction: Faction,
        resources: ResourceSnapshot,
    },
    TurnChanged {
        change: TurnChange,
        resources: ResourceSnapshot,
    },
    EquipmentOffered {
        faction: Faction,
        cost: i64,
        items: Vec<EquipmentItem>,
        resources: ResourceSnapshot,
    },
    ItemEquipped {
        faction: Faction,
        unit: UnitId,
        item: EquipmentItem,
        unit_stats: UnitStats,
        resources: ResourceSnapshot,
    },
    EquipmentCrafted {
        faction: Faction,
        outcome: CraftOutcome,
        resources: ResourceSnapshot,
    },
    KillRewarded {
        faction: Faction,
        victim: UnitId,
        amount: i64,
    },
    CompensationGranted {
        faction: Faction,
        amount: i64,
    },
    GameOver {
        winner: Faction,
        reason: GameOverReason,
    },
    ActionRejected {
        action: String,
        kind: crate::core::ErrorKind,
        code: String,
        message: String,
    },
    MatchAborted {
        message: String,
    },
    FullState {
        state: FullState,
    },
}
