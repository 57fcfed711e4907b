//! Per-room session: draft, play, game over.
//!
//! ## Atomicity
//!
//! Each request runs to completion against a checkpoint of the match state,
//! draft and RNG. Clones are cheap (`im` rosters). Caller errors restore the
//! checkpoint and are reported to the sender only. Internal consistency
//! failures restore the checkpoint, end the match and notify both sides.
//!
//! ## Lifecycle
//!
//! `picking -> playing -> over`. Nothing but `request_state` is accepted once
//! the match is over.

use std::sync::Arc;

use super::draft::Draft;
use super::events::{FullState, GameOverReason, Outbound, ResourceSnapshot, ServerEvent};
use crate::abilities::AbilityResolver;
use crate::catalog::{Catalogs, HeroKind};
use crate::combat::CombatResolver;
use crate::core::{
    ActionKind, ActionRequest, ArenaError, Faction, FactionMap, GameRng, MatchConfig, MatchState, Phase,
    RandomSource, Result, UnitId,
};
use crate::equipment::EquipmentSystem;
use crate::turn::{BudgetedAction, TurnScheduler};

/// One room's authoritative match.
#[derive(Clone, Debug)]
pub struct Session<R = GameRng> {
    config: MatchConfig,
    catalogs: Arc<Catalogs>,
    draft: Draft,
    /// Phase before the match state exists (drafting, or ended mid-draft).
    draft_phase: Phase,
    state: Option<MatchState>,
    rng: R,
}

impl Session<GameRng> {
    /// New session seeded from the config.
    #[must_use]
    pub fn new(config: MatchConfig, catalogs: Arc<Catalogs>) -> Self {
        let rng = GameRng::new(config.seed);
        Self::with_rng(config, catalogs, rng)
    }
}

impl<R: RandomSource + Clone> Session<R> {
    /// New session drawing from the given random source.
    pub fn with_rng(config: MatchConfig, catalogs: Arc<Catalogs>, rng: R) -> Self {
        let draft = Draft::new(config.team_size, catalogs.heroes.kinds());
        Self {
            config,
            catalogs,
            draft,
            draft_phase: Phase::Picking,
            state: None,
            rng,
        }
    }

    /// Run the draft with fixed rosters and start the match.
    ///
    /// Each roster is consumed in order as its faction's picks come up.
    pub fn from_rosters(
        config: MatchConfig,
        catalogs: Arc<Catalogs>,
        rosters: &FactionMap<Vec<HeroKind>>,
        rng: R,
    ) -> Result<Self> {
        let mut session = Self::with_rng(config, catalogs, rng);
        let mut cursors = FactionMap::with_value(0usize);
        while let Some(faction) = session.draft.next_picker() {
            let pick = cursors[faction];
            let hero = *rosters[faction]
                .get(pick)
                .ok_or(ArenaError::IncompleteRoster { faction, pick: pick + 1 })?;
            cursors[faction] += 1;
            session.pick_hero(faction, hero)?;
        }
        Ok(session)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.as_ref().map_or(self.draft_phase, |state| state.phase)
    }

    /// Match state once the draft is complete.
    #[must_use]
    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    #[must_use]
    pub fn winner(&self) -> Option<Faction> {
        self.state.as_ref().and_then(|state| state.winner)
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Complete reconciliation snapshot. Never mutates.
    #[must_use]
    pub fn full_state(&self) -> FullState {
        match &self.state {
            Some(state) => FullState::capture(state, self.draft.picks()),
            None => {
                let mut snapshot = FullState::drafting(self.draft.picks());
                snapshot.phase = self.draft_phase;
                snapshot
            }
        }
    }

    /// Process one request and return the events it produced.
    pub fn handle(&mut self, request: ActionRequest) -> Vec<Outbound> {
        let ActionRequest { faction, kind } = request;
        if kind == ActionKind::RequestState {
            return vec![Outbound::only(
                faction,
                ServerEvent::FullState {
                    state: self.full_state(),
                },
            )];
        }

        let checkpoint = (self.state.clone(), self.draft.clone(), self.draft_phase, self.rng.clone());
        let result = self.dispatch(faction, &kind).and_then(|events| {
            if let Some(state) = self.state.as_mut() {
                if !matches!(kind, ActionKind::PickHero { .. }) {
                    state.record(faction, kind.clone());
                }
                state.check_invariants()?;
            }
            Ok(events)
        });

        match result {
            Ok(events) => events,
            Err(err) => {
                (self.state, self.draft, self.draft_phase, self.rng) = checkpoint;
                if err.is_fatal() {
                    self.abort(&err)
                } else {
                    tracing::warn!(%faction, action = kind.name(), code = err.code(), error = %err, "action rejected");
                    vec![Outbound::only(
                        faction,
                        ServerEvent::ActionRejected {
                            action: kind.name().to_string(),
                            kind: err.kind(),
                            code: err.code().to_string(),
                            message: err.to_string(),
                        },
                    )]
                }
            }
        }
    }

    /// A faction left. An unfinished match goes to the other side.
    pub fn disconnect(&mut self, faction: Faction) -> Vec<Outbound> {
        if self.phase() == Phase::Over {
            return Vec::new();
        }
        let winner = faction.opponent();
        self.draft_phase = Phase::Over;
        if let Some(state) = self.state.as_mut() {
            state.phase = Phase::Over;
            state.winner = Some(winner);
        }
        tracing::info!(%faction, %winner, "match forfeited");
        vec![Outbound::only(
            winner,
            ServerEvent::GameOver {
                winner,
                reason: GameOverReason::Forfeit,
            },
        )]
    }

    fn abort(&mut self, err: &ArenaError) -> Vec<Outbound> {
        tracing::error!(error = %err, "match aborted");
        self.draft_phase = Phase::Over;
        if let Some(state) = self.state.as_mut() {
            state.phase = Phase::Over;
        }
        vec![Outbound::both(ServerEvent::MatchAborted {
            message: err.to_string(),
        })]
    }

    fn dispatch(&mut self, faction: Faction, kind: &ActionKind) -> Result<Vec<Outbound>> {
        match kind {
            ActionKind::PickHero { hero } => self.pick_hero(faction, *hero),
            ActionKind::Attack { attacker, target } => self.attack(faction, *attacker, *target),
            ActionKind::Skill { caster, target } => self.skill(faction, *caster, *target),
            ActionKind::UseUltimate => self.use_ultimate(faction),
            ActionKind::EndTurn => self.end_turn(faction),
            ActionKind::BuyEquipment => self.buy_equipment(faction),
            ActionKind::EquipItem { item_id, unit } => self.equip_item(faction, item_id, *unit),
            ActionKind::CraftEquipment { unit, first, second } => self.craft(faction, *unit, first, second),
            ActionKind::RequestState => Ok(vec![Outbound::only(
                faction,
                ServerEvent::FullState {
                    state: self.full_state(),
                },
            )]),
        }
    }

    fn playing(state: &mut Option<MatchState>, draft_phase: Phase) -> Result<&mut MatchState> {
        match state {
            Some(state) => {
                if state.phase == Phase::Playing {
                    Ok(state)
                } else {
                    Err(ArenaError::WrongPhase(state.phase.to_string()))
                }
            }
            None => Err(ArenaError::WrongPhase(draft_phase.to_string())),
        }
    }

    /// The unit exists, is alive and belongs to `faction`.
    fn check_controller(state: &MatchState, faction: Faction, unit: UnitId) -> Result<()> {
        let found = state.require_unit(unit)?;
        if found.faction != faction {
            return Err(ArenaError::NotUnitController { faction, unit });
        }
        if !found.is_alive() {
            return Err(ArenaError::UnitNotFound(unit));
        }
        Ok(())
    }

    fn living_ids(state: &MatchState) -> Vec<UnitId> {
        state.all_units().filter(|unit| unit.is_alive()).map(|unit| unit.id).collect()
    }

    /// Kill rewards, death compensation and elimination after a damaging action.
    fn settle_casualties(state: &mut MatchState, alive_before: &[UnitId]) -> Result<Vec<Outbound>> {
        let mut events = Vec::new();
        let killed: Vec<UnitId> = alive_before
            .iter()
            .copied()
            .filter(|&id| state.unit(id).is_some_and(|unit| !unit.is_alive()))
            .collect();

        for victim in killed {
            let beneficiary = state.require_unit(victim)?.faction.opponent();
            state.ledger.kill_reward(beneficiary)?;
            tracing::info!(%victim, faction = %beneficiary, "unit killed");
            events.push(Outbound::both(ServerEvent::KillRewarded {
                faction: beneficiary,
                victim,
                amount: state.rules.kill_reward,
            }));
        }

        for faction in Faction::ALL {
            let deaths = state.dead_count(faction);
            if deaths >= state.rules.compensation_deaths && !state.factions[faction].compensated {
                state.ledger.death_compensation(faction)?;
                state.factions[faction].compensated = true;
                tracing::info!(%faction, deaths, "death compensation granted");
                events.push(Outbound::both(ServerEvent::CompensationGranted {
                    faction,
                    amount: state.rules.death_compensation,
                }));
            }
        }

        if let Some(loser) = Faction::ALL.into_iter().find(|&f| state.living_count(f) == 0) {
            let winner = loser.opponent();
            state.phase = Phase::Over;
            state.winner = Some(winner);
            tracing::info!(%winner, "faction eliminated");
            events.push(Outbound::both(ServerEvent::GameOver {
                winner,
                reason: GameOverReason::Elimination,
            }));
        }
        Ok(events)
    }

    fn turn_changed(state: &mut MatchState) -> Result<Outbound> {
        let change = TurnScheduler::end_turn(state)?;
        Ok(Outbound::both(ServerEvent::TurnChanged {
            change,
            resources: ResourceSnapshot::capture(state),
        }))
    }

    fn pick_hero(&mut self, faction: Faction, hero: HeroKind) -> Result<Vec<Outbound>> {
        if self.state.is_some() || self.draft_phase != Phase::Picking {
            return Err(ArenaError::WrongPhase(self.phase().to_string()));
        }
        let pick = self.draft.pick(faction, hero)?;
        let mut events = vec![Outbound::both(ServerEvent::HeroPicked {
            faction,
            hero,
            next_picker: pick.next,
        })];

        if self.draft.is_complete() {
            let heroes = &self.catalogs.heroes;
            let mut rosters = FactionMap::new(|_| Vec::new());
            for (side, picks) in self.draft.picks().iter() {
                for &kind in picks {
                    rosters[side].push(heroes.get(kind)?);
                }
            }
            let state = MatchState::new(self.config.rules, &rosters);
            tracing::info!(team_size = ?self.config.team_size, "match started");
            events.push(Outbound::both(ServerEvent::MatchStarted {
                state: FullState::capture(&state, self.draft.picks()),
            }));
            self.draft_phase = Phase::Playing;
            self.state = Some(state);
        }
        Ok(events)
    }

    fn attack(&mut self, faction: Faction, attacker: UnitId, target: UnitId) -> Result<Vec<Outbound>> {
        let state = Self::playing(&mut self.state, self.draft_phase)?;
        TurnScheduler::check_action(state, faction)?;
        Self::check_controller(state, faction, attacker)?;

        let alive_before = Self::living_ids(state);
        let outcome = CombatResolver::resolve_attack(state, &mut self.rng, attacker, target)?;
        TurnScheduler::record_action(state, faction, BudgetedAction::Attack);
        let settlement = Self::settle_casualties(state, &alive_before)?;

        let mut events = vec![Outbound::both(ServerEvent::AttackResolved {
            faction,
            outcome,
            resources: ResourceSnapshot::capture(state),
        })];
        events.extend(settlement);
        Ok(events)
    }

    fn skill(&mut self, faction: Faction, caster: UnitId, target: Option<UnitId>) -> Result<Vec<Outbound>> {
        let state = Self::playing(&mut self.state, self.draft_phase)?;
        TurnScheduler::check_action(state, faction)?;
        Self::check_controller(state, faction, caster).map_err(|err| match err {
            ArenaError::UnitNotFound(id) => ArenaError::CasterNotFound(id),
            other => other,
        })?;

        let unit = state.require_unit(caster)?;
        let (skill_cost, ends_turn) = (unit.skill_cost, unit.skill_ends_turn);
        let points = &mut state.factions[faction].skill_points;
        let available = points.value();
        if !points.try_spend(skill_cost) {
            return Err(ArenaError::InsufficientSkillPoints {
                required: skill_cost,
                available,
            });
        }

        let alive_before = Self::living_ids(state);
        let outcome = AbilityResolver::resolve(state, &mut self.rng, caster, target)?;
        TurnScheduler::record_action(state, faction, BudgetedAction::Ability);
        let settlement = Self::settle_casualties(state, &alive_before)?;

        let mut events = vec![Outbound::both(ServerEvent::SkillResolved {
            faction,
            skill_cost,
            outcome,
            resources: ResourceSnapshot::capture(state),
        })];
        events.extend(settlement);

        if ends_turn && state.phase == Phase::Playing {
            events.push(Self::turn_changed(state)?);
        }
        Ok(events)
    }

    fn use_ultimate(&mut self, faction: Faction) -> Result<Vec<Outbound>> {
        let state = Self::playing(&mut self.state, self.draft_phase)?;
        let change = TurnScheduler::use_ultimate(state, faction)?;
        let resources = ResourceSnapshot::capture(state);
        Ok(vec![
            Outbound::both(ServerEvent::UltimateUsed {
                faction,
                resources: resources.clone(),
            }),
            Outbound::both(ServerEvent::TurnChanged { change, resources }),
        ])
    }

    fn end_turn(&mut self, faction: Faction) -> Result<Vec<Outbound>> {
        let state = Self::playing(&mut self.state, self.draft_phase)?;
        TurnScheduler::check_turn(state, faction)?;
        Ok(vec![Self::turn_changed(state)?])
    }

    fn buy_equipment(&mut self, faction: Faction) -> Result<Vec<Outbound>> {
        let state = Self::playing(&mut self.state, self.draft_phase)?;
        TurnScheduler::check_turn(state, faction)?;

        let cost = state.ledger.equipment_purchase_cost();
        state.ledger.purchase_equipment(faction)?;
        let items = self
            .catalogs
            .equipment
            .draw_basic(&mut self.rng, state.rules.equipment_draw);
        if items.is_empty() {
            return Err(ArenaError::EquipmentNotFound("basic equipment pool is empty".to_string()));
        }
        state.factions[faction].pending_offer = items.clone();
        tracing::info!(%faction, cost, offered = items.len(), "equipment purchased");

        Ok(vec![Outbound::both(ServerEvent::EquipmentOffered {
            faction,
            cost,
            items,
            resources: ResourceSnapshot::capture(state),
        })])
    }

    fn equip_item(&mut self, faction: Faction, item_id: &str, unit: UnitId) -> Result<Vec<Outbound>> {
        let state = Self::playing(&mut self.state, self.draft_phase)?;
        TurnScheduler::check_turn(state, faction)?;
        Self::check_controller(state, faction, unit)?;

        let offer = &state.factions[faction].pending_offer;
        let item = offer
            .iter()
            .find(|item| item.id == item_id)
            .cloned()
            .ok_or_else(|| ArenaError::OfferItemNotFound(item_id.to_string()))?;

        let slots = state.rules.equipment_slots;
        let target = state.unit_mut(unit).ok_or(ArenaError::UnitNotFound(unit))?;
        EquipmentSystem::equip(target, item.clone(), slots)?;
        let unit_stats = target.stats();
        state.factions[faction].pending_offer.clear();

        Ok(vec![Outbound::both(ServerEvent::ItemEquipped {
            faction,
            unit,
            item,
            unit_stats,
            resources: ResourceSnapshot::capture(state),
        })])
    }

    fn craft(&mut self, faction: Faction, unit: UnitId, first: &str, second: &str) -> Result<Vec<Outbound>> {
        let state = Self::playing(&mut self.state, self.draft_phase)?;
        TurnScheduler::check_turn(state, faction)?;
        Self::check_controller(state, faction, unit)?;

        let outcome = EquipmentSystem::craft(state, &self.catalogs.recipes, faction, unit, first, second)?;
        Ok(vec![Outbound::both(ServerEvent::EquipmentCrafted {
            faction,
            outcome,
            resources: ResourceSnapshot::capture(state),
        })])
    }
}
