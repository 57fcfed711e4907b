//! Faction identification and per-faction data storage.
//!
//! ## Faction
//!
//! The two opposing sides of a match. Blue is the host seat and acts on odd
//! turns, red is the guest seat and acts on even turns.
//!
//! ## FactionMap
//!
//! Fixed two-slot storage indexed by `Faction`. There is exactly one value per
//! faction, so host/guest naming is only ever a derived view over it.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two opposing teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Blue,
    Red,
}

/// Seat naming used by the room layer. Host plays blue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Host,
    Guest,
}

impl Faction {
    /// Both factions in turn order.
    pub const ALL: [Faction; 2] = [Faction::Blue, Faction::Red];

    /// The other faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Faction::Blue => Faction::Red,
            Faction::Red => Faction::Blue,
        }
    }

    /// Faction that acts on the given turn number (odd = blue).
    ///
    /// ```
    /// use hero_duel::core::Faction;
    ///
    /// assert_eq!(Faction::for_turn(1), Faction::Blue);
    /// assert_eq!(Faction::for_turn(2), Faction::Red);
    /// assert_eq!(Faction::for_turn(7), Faction::Blue);
    /// ```
    #[must_use]
    pub const fn for_turn(turn: u32) -> Self {
        if turn % 2 == 1 {
            Faction::Blue
        } else {
            Faction::Red
        }
    }

    #[must_use]
    pub const fn from_seat(seat: Seat) -> Self {
        match seat {
            Seat::Host => Faction::Blue,
            Seat::Guest => Faction::Red,
        }
    }

    #[must_use]
    pub const fn seat(self) -> Seat {
        match self {
            Faction::Blue => Seat::Host,
            Faction::Red => Seat::Guest,
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Blue => write!(f, "blue"),
            Faction::Red => write!(f, "red"),
        }
    }
}

/// Per-faction data storage.
///
/// ## Example
///
/// ```
/// use hero_duel::core::{Faction, FactionMap};
///
/// let mut gold: FactionMap<i64> = FactionMap::with_value(10);
/// gold[Faction::Red] += 5;
///
/// assert_eq!(gold[Faction::Blue], 10);
/// assert_eq!(gold[Faction::Red], 15);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionMap<T> {
    blue: T,
    red: T,
}

impl<T> FactionMap<T> {
    /// Create with a factory function called once per faction.
    pub fn new(mut factory: impl FnMut(Faction) -> T) -> Self {
        Self {
            blue: factory(Faction::Blue),
            red: factory(Faction::Red),
        }
    }

    /// Create with every entry set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            blue: value.clone(),
            red: value,
        }
    }

    /// Iterate over `(faction, &value)` pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Faction, &T)> {
        [(Faction::Blue, &self.blue), (Faction::Red, &self.red)].into_iter()
    }

    /// Map each entry to a new value.
    pub fn map<U>(&self, mut f: impl FnMut(Faction, &T) -> U) -> FactionMap<U> {
        FactionMap {
            blue: f(Faction::Blue, &self.blue),
            red: f(Faction::Red, &self.red),
        }
    }
}

impl<T> Index<Faction> for FactionMap<T> {
    type Output = T;

    fn index(&self, faction: Faction) -> &Self::Output {
        match faction {
            Faction::Blue => &self.blue,
            Faction::Red => &self.red,
        }
    }
}

impl<T> IndexMut<Faction> for FactionMap<T> {
    fn index_mut(&mut self, faction: Faction) -> &mut Self::Output {
        match faction {
            Faction::Blue => &mut self.blue,
            Faction::Red => &mut self.red,
        }
    }
}
