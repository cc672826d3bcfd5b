//! Seeded random source.
//!
//! Every probabilistic decision of a run draws from one [`RandomGenerator`],
//! so a fixed seed reproduces the whole output. Draw order matters: adding or
//! moving a draw changes every later result.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub const ALPHANUMERIC: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub struct RandomGenerator {
    seed: u64,
    inner: Pcg64Mcg,
}

impl RandomGenerator {
    /// `None` seeds from entropy; the chosen seed stays readable through [`Self::seed`].
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in [0, 1).
    pub fn get_math_random(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform integer in `[min, max]`, both inclusive.
    pub fn get_random_integer(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Uniform integer in `[min, max]` that is not in `excluded`. `None` when
    /// every candidate is excluded.
    pub fn get_random_integer_excluding(
        &mut self,
        min: i64,
        max: i64,
        excluded: &[i64],
    ) -> Option<i64> {
        let candidates: Vec<i64> = (min..=max).filter(|n| !excluded.contains(n)).collect();
        candidates.choose(&mut self.inner).copied()
    }

    /// Random string of `length` characters drawn from `pool`.
    pub fn get_random_string(&mut self, length: usize, pool: &str) -> String {
        let pool: Vec<char> = pool.chars().collect();
        (0..length)
            .filter_map(|_| pool.choose(&mut self.inner).copied())
            .collect()
    }

    pub fn pick_one<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
