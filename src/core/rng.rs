//! Injectable randomness for combat rolls and equipment draws.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Cheap checkpoints**: `Clone` copies the stream position
//! - **Scriptable**: `ScriptedRng` replays fixed draws for tests and replays
//!
//! Every roll in the engine goes through [`RandomSource`], so a session can run
//! on a seeded `GameRng` in production and on a `ScriptedRng` under test.
//!
//! ```
//! use hero_duel::core::{GameRng, RandomSource};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.next_unit(), b.next_unit());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random source used by every resolver.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..upper`. `upper` must be non-zero.
    fn next_index(&mut self, upper: usize) -> usize;

    /// Draw once and report whether it landed below `chance`.
    fn roll(&mut self, chance: f64) -> bool {
        self.next_unit() < chance
    }
}

/// Deterministic match RNG.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    fn next_index(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..upper)
    }
}

/// Replays a fixed list of unit draws.
///
/// Once the script runs out every further draw returns `fallback`, which
/// defaults to a value just below 1.0 so no chance-based effect fires.
///
/// ```
/// use hero_duel::core::{RandomSource, ScriptedRng};
///
/// let mut rng = ScriptedRng::new(vec![0.0, 0.5]);
/// assert!(rng.roll(0.1));
/// assert!(!rng.roll(0.1));
/// assert!(!rng.roll(0.9999));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedRng {
    draws: Vec<f64>,
    cursor: usize,
    fallback: f64,
}

impl ScriptedRng {
    pub const DEFAULT_FALLBACK: f64 = 0.999_999;

    #[must_use]
    pub fn new(draws: Vec<f64>) -> Self {
        Self {
            draws,
            cursor: 0,
            fallback: Self::DEFAULT_FALLBACK,
        }
    }

    /// Draws that never trigger a chance-based effect.
    #[must_use]
    pub fn never() -> Self {
        Self::new(Vec::new())
    }

    /// Draws that always trigger a chance-based effect.
    #[must_use]
    pub fn always() -> Self {
        Self::new(Vec::new()).with_fallback(0.0)
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback.clamp(0.0, Self::DEFAULT_FALLBACK);
        self
    }

    /// Number of draws consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        let value = self.draws.get(self.cursor).copied().unwrap_or(self.fallback);
        self.cursor += 1;
        value
    }

    fn next_index(&mut self, upper: usize) -> usize {
        let scaled = (self.next_unit() * upper as f64).floor() as usize;
        scaled.min(upper.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_index(1000), rng2.next_index(1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.next_index(1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.next_index(1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_unit_draws_in_range() {
        let mut rng = GameRng::new(7);
        for _ in 0..1000 {
            let value = rng.next_unit();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_clone_resumes_stream() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.next_unit();
        }

        let mut checkpoint = rng.clone();
        assert_eq!(checkpoint.seed(), 42);
        let expected: Vec<_> = (0..10).map(|_| rng.next_index(1000)).collect();
        let actual: Vec<_> = (0..10).map(|_| checkpoint.next_index(1000)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_scripted_replay_then_fallback() {
        let mut rng = ScriptedRng::new(vec![0.25, 0.75]);
        assert_eq!(rng.next_unit(), 0.25);
        assert_eq!(rng.next_unit(), 0.75);
        assert_eq!(rng.next_unit(), ScriptedRng::DEFAULT_FALLBACK);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn test_scripted_index_stays_in_bounds() {
        let mut rng = ScriptedRng::new(vec![0.0, 0.5, 0.99]);
        assert_eq!(rng.next_index(4), 0);
        assert_eq!(rng.next_index(4), 2);
        assert_eq!(rng.next_index(4), 3);
    }

    #[test]
    fn test_always_and_never() {
        assert!(ScriptedRng::always().roll(0.01));
        assert!(!ScriptedRng::never().roll(0.99));
    }
}
