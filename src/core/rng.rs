//! Deterministic random number generation.
//!
//! Chance conditions and random target ordering roll against one seeded
//! stream so a replayed event sequence reproduces the same outcomes.
//! Uses ChaCha8 for speed while keeping high-quality randomness.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded RNG for skill execution.
#[derive(Clone, Debug)]
pub struct SkillRng {
    inner: ChaCha8Rng,
}

impl SkillRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from the system entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Roll a uniform value in `[0, 1)`.
    pub fn roll(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Check a percentage chance in `[0, 100]`.
    pub fn chance(&mut self, percent: f64) -> bool {
        self.roll() * 100.0 < percent
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let mut a = SkillRng::new(42);
        let mut b = SkillRng::new(42);
        for _ in 0..16 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = SkillRng::new(1);
        for _ in 0..32 {
            assert!(rng.chance(100.0));
            assert!(!rng.chance(0.0));
        }
    }

    #[test]
    fn test_shuffle_deterministic() {
        let mut a = SkillRng::new(7);
        let mut b = SkillRng::new(7);
        let mut xs: Vec<u32> = (0..10).collect();
        let mut ys: Vec<u32> = (0..10).collect();
        a.shuffle(&mut xs);
        b.shuffle(&mut ys);
        assert_eq!(xs, ys);
    }
}
