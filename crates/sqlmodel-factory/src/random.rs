//! Random-generation service used for quantity and key selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for pivot population.
pub trait SeedRng {
    /// Uniform integer in `low..=high`.
    fn uniform_int(&mut self, low: usize, high: usize) -> usize;

    /// `k` distinct indices drawn uniformly from `0..len`, in no particular order.
    ///
    /// Callers guarantee `k <= len`.
    fn sample_indices(&mut self, len: usize, k: usize) -> Vec<usize>;
}

/// `SeedRng` backed by `rand`'s standard generator.
#[derive(Debug, Clone)]
pub struct StdSeedRng {
    rng: StdRng,
}

impl StdSeedRng {
    /// Seed from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed deterministically; the same seed replays the same choices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdSeedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl SeedRng for StdSeedRng {
    fn uniform_int(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }

    fn sample_indices(&mut self, len: usize, k: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, len, k).into_vec()
    }
}

impl<R: SeedRng + ?Sized> SeedRng for &mut R {
    fn uniform_int(&mut self, low: usize, high: usize) -> usize {
        (**self).uniform_int(low, high)
    }

    fn sample_indices(&mut self, len: usize, k: usize) -> Vec<usize> {
        (**self).sample_indices(len, k)
    }
}

impl<R: SeedRng + ?Sized> SeedRng for Box<R> {
    fn uniform_int(&mut self, low: usize, high: usize) -> usize {
        (**self).uniform_int(low, high)
    }

    fn sample_indices(&mut self, len: usize, k: usize) -> Vec<usize> {
        (**self).sample_indices(len, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uniform_int_is_inclusive() {
        let mut rng = StdSeedRng::seeded(7);
        let seen: HashSet<usize> = (0..500).map(|_| rng.uniform_int(0, 3)).collect();
        assert_eq!(seen, HashSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn test_sample_indices_distinct_and_in_range() {
        let mut rng = StdSeedRng::seeded(11);
        for k in 0..=10 {
            let picked = rng.sample_indices(10, k);
            assert_eq!(picked.len(), k);
            let unique: HashSet<_> = picked.iter().copied().collect();
            assert_eq!(unique.len(), k);
            assert!(picked.iter().all(|&i| i < 10));
        }
    }

    #[test]
    fn test_same_seed_replays() {
        let mut a = StdSeedRng::seeded(42);
        let mut b = StdSeedRng::seeded(42);
        assert_eq!(a.sample_indices(20, 5), b.sample_indices(20, 5));
        assert_eq!(a.uniform_int(0, 100), b.uniform_int(0, 100));
    }
}
