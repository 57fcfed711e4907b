//! Capped non-negative counters for skill points and ultimate charge.

use serde::{Deserialize, Serialize};

/// What an `add_capped` call actually did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterGain {
    pub gained: u32,
    /// Requested amount that did not fit under the cap.
    pub overflow: u32,
}

/// A counter in `0..=cap`.
///
/// ```
/// use hero_duel::economy::BoundedCounter;
///
/// let mut points = BoundedCounter::new(5, 6);
/// let gain = points.add_capped(3);
/// assert_eq!((gain.gained, gain.overflow), (1, 2));
/// assert!(points.try_spend(4));
/// assert!(!points.try_spend(4));
/// assert_eq!(points.value(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedCounter {
    value: u32,
    cap: u32,
}

impl BoundedCounter {
    /// Create a counter; the initial value is clamped to the cap.
    #[must_use]
    pub fn new(value: u32, cap: u32) -> Self {
        Self {
            value: value.min(cap),
            cap,
        }
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.value
    }

    #[must_use]
    pub const fn cap(self) -> u32 {
        self.cap
    }

    #[must_use]
    pub const fn is_full(self) -> bool {
        self.value >= self.cap
    }

    pub fn add_capped(&mut self, amount: u32) -> CounterGain {
        let room = self.cap - self.value;
        let gained = amount.min(room);
        self.value += gained;
        CounterGain {
            gained,
            overflow: amount - gained,
        }
    }

    /// Spend `amount` if available. Never partially spends.
    pub fn try_spend(&mut self, amount: u32) -> bool {
        if amount > self.value {
            return false;
        }
        self.value -= amount;
        true
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        assert_eq!(BoundedCounter::new(9, 6).value(), 6);
    }

    #[test]
    fn test_add_within_cap() {
        let mut counter = BoundedCounter::new(0, 5);
        assert_eq!(counter.add_capped(1), CounterGain { gained: 1, overflow: 0 });
        assert_eq!(counter.value(), 1);
        assert!(!counter.is_full());
    }

    #[test]
    fn test_add_at_cap() {
        let mut counter = BoundedCounter::new(6, 6);
        assert_eq!(counter.add_capped(3), CounterGain { gained: 0, overflow: 3 });
        assert!(counter.is_full());
    }

    #[test]
    fn test_spend_and_reset() {
        let mut counter = BoundedCounter::new(4, 6);
        assert!(counter.try_spend(4));
        assert_eq!(counter.value(), 0);
        assert!(!counter.try_spend(1));
        counter.add_capped(2);
        counter.reset();
        assert_eq!(counter.value(), 0);
    }
}
