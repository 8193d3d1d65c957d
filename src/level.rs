// Copyright 2018 Jeffery Xiao, 2019 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tower heights for newly inserted nodes.
//!
//! When a node is inserted it is also linked into levels `1..=level` with a
//! probability that halves at each step: `P(level >= k) = 2^-k`. This is
//! what keeps the expected search depth logarithmic.
//!
//! The generator is owned by the list and can be swapped out, e.g. for a
//! seeded one in tests that need to assert exact tower layouts.

use crate::node::MAX_LEVEL;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// Source of tower heights.
///
/// `random_level()` must return a value in `[0, total())`.
pub trait LevelGenerator {
    /// Draws the level for a new node.
    fn random_level(&mut self) -> usize;

    /// The number of levels this generator draws from.
    fn total(&self) -> usize;
}

/// Fair-coin geometric level generator.
///
/// Each extra level is one more trailing `1` bit in a 32-bit draw, so a
/// level is reached with half the probability of the one below it. Draws
/// are capped at `total() - 1`.
#[derive(Clone, Debug)]
pub struct GeometricLevelGenerator<R: RngCore = SmallRng> {
    rng: R,
    total: usize,
}

impl GeometricLevelGenerator<SmallRng> {
    /// Creates a generator over all [`MAX_LEVEL`] levels, seeded from the OS.
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_entropy(), MAX_LEVEL)
    }

    /// Creates a deterministic generator over all [`MAX_LEVEL`] levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::{GeometricLevelGenerator, LevelGenerator};
    ///
    /// let mut a = GeometricLevelGenerator::seeded(42);
    /// let mut b = GeometricLevelGenerator::seeded(42);
    /// for _ in 0..32 {
    ///     assert_eq!(a.random_level(), b.random_level());
    /// }
    /// ```
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed), MAX_LEVEL)
    }
}

impl Default for GeometricLevelGenerator<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> GeometricLevelGenerator<R> {
    /// Creates a generator drawing from `rng` over `total` levels.
    ///
    /// # Panics
    ///
    /// Panics if `total` is zero or greater than [`MAX_LEVEL`].
    pub fn from_rng(rng: R, total: usize) -> Self {
        assert!(total > 0, "total must be non-zero");
        assert!(total <= MAX_LEVEL, "total must not exceed MAX_LEVEL");
        GeometricLevelGenerator { rng, total }
    }
}

impl<R: RngCore> LevelGenerator for GeometricLevelGenerator<R> {
    #[inline]
    fn random_level(&mut self) -> usize {
        let level = self.rng.next_u32().trailing_ones() as usize;
        level.min(self.total - 1)
    }

    fn total(&self) -> usize {
        self.total
    }
}
