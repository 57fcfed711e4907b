//! Hero draft.
//!
//! Pick order is blue, red, red, blue, blue, red for 3v3 and the first four
//! of those for 2v2. Each pick removes the hero from the shared pool.

use serde::{Deserialize, Serialize};

use crate::catalog::HeroKind;
use crate::core::{ArenaError, Faction, FactionMap, Result, TeamSize};

const PICK_ORDER: [Faction; 6] = [
    Faction::Blue,
    Faction::Red,
    Faction::Red,
    Faction::Blue,
    Faction::Blue,
    Faction::Red,
];

/// Result of an accepted pick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub faction: Faction,
    pub hero: HeroKind,
    /// Who picks next, or `None` once the draft is complete.
    pub next: Option<Faction>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    order: Vec<Faction>,
    cursor: usize,
    pool: Vec<HeroKind>,
    picks: FactionMap<Vec<HeroKind>>,
}

impl Draft {
    /// Start a draft over `pool`.
    #[must_use]
    pub fn new(team_size: TeamSize, pool: Vec<HeroKind>) -> Self {
        Self {
            order: PICK_ORDER[..team_size.units() * 2].to_vec(),
            cursor: 0,
            pool,
            picks: FactionMap::default(),
        }
    }

    /// Faction expected to pick next.
    #[must_use]
    pub fn next_picker(&self) -> Option<Faction> {
        self.order.get(self.cursor).copied()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.order.len()
    }

    /// Heroes still available.
    #[must_use]
    pub fn pool(&self) -> &[HeroKind] {
        &self.pool
    }

    #[must_use]
    pub fn picks(&self) -> &FactionMap<Vec<HeroKind>> {
        &self.picks
    }

    pub fn pick(&mut self, faction: Faction, hero: HeroKind) -> Result<Pick> {
        if self.next_picker() != Some(faction) {
            return Err(ArenaError::WrongTurnOrSeat(faction));
        }
        let index = self
            .pool
            .iter()
            .position(|&kind| kind == hero)
            .ok_or(ArenaError::HeroUnavailable(hero))?;
        self.pool.remove(index);
        self.picks[faction].push(hero);
        self.cursor += 1;
        tracing::info!(%faction, %hero, remaining = self.pool.len(), "hero picked");
        Ok(Pick {
            faction,
            hero,
            next: self.next_picker(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(size: TeamSize) -> Draft {
        Draft::new(size, HeroKind::ALL.to_vec())
    }

    #[test]
    fn test_trio_order() {
        let mut draft = draft(TeamSize::Trio);
        let mut seen = Vec::new();
        for hero in &HeroKind::ALL[..6] {
            let faction = draft.next_picker().unwrap();
            seen.push(faction);
            draft.pick(faction, *hero).unwrap();
        }
        assert_eq!(seen, PICK_ORDER.to_vec());
        assert!(draft.is_complete());
        assert_eq!(draft.picks()[Faction::Blue].len(), 3);
        assert_eq!(draft.pool().len(), 2);
    }

    #[test]
    fn test_duo_order() {
        let mut draft = draft(TeamSize::Duo);
        draft.pick(Faction::Blue, HeroKind::Lan).unwrap();
        draft.pick(Faction::Red, HeroKind::Yao).unwrap();
        draft.pick(Faction::Red, HeroKind::Dolia).unwrap();
        let last = draft.pick(Faction::Blue, HeroKind::DaQiao).unwrap();
        assert_eq!(last.next, None);
        assert!(draft.is_complete());
    }

    #[test]
    fn test_out_of_order() {
        let mut draft = draft(TeamSize::Trio);
        assert_eq!(
            draft.pick(Faction::Red, HeroKind::Lan).unwrap_err(),
            ArenaError::WrongTurnOrSeat(Faction::Red)
        );
        assert_eq!(draft.pool().len(), 8);
    }

    #[test]
    fn test_hero_taken() {
        let mut draft = draft(TeamSize::Trio);
        draft.pick(Faction::Blue, HeroKind::Lan).unwrap();
        assert_eq!(
            draft.pick(Faction::Red, HeroKind::Lan).unwrap_err(),
            ArenaError::HeroUnavailable(HeroKind::Lan)
        );
        assert_eq!(draft.next_picker(), Some(Faction::Red));
    }

    #[test]
    fn test_no_picks_after_completion() {
        let mut draft = draft(TeamSize::Duo);
        for (faction, hero) in [
            (Faction::Blue, HeroKind::Lan),
            (Faction::Red, HeroKind::Yao),
            (Faction::Red, HeroKind::Dolia),
            (Faction::Blue, HeroKind::DaQiao),
        ] {
            draft.pick(faction, hero).unwrap();
        }
        assert!(draft.pick(Faction::Red, HeroKind::GongsunLi).is_err());
    }
}
