//! Randomized access patterns.
//!
//! A pattern is a permutation of `[0, N)` describing the order in which
//! subscribers are touched, so that logical connection order is decoupled
//! from physical array order.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// RNG used throughout the harness. Seeded, so runs are reproducible.
pub type BenchRng = ChaCha8Rng;

/// An ordered sequence of N distinct indices in `[0, N)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPattern {
    indices: Vec<usize>,
}

impl AccessPattern {
    /// The identity pattern `0, 1, .., n-1`.
    pub fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    /// A freshly shuffled pattern of size `n`.
    pub fn shuffled(n: usize, rng: &mut BenchRng) -> Self {
        let mut pattern = Self::identity(n);
        pattern.reshuffle(rng);
        pattern
    }

    /// Re-permute the existing indices in place.
    pub fn reshuffle(&mut self, rng: &mut BenchRng) {
        self.indices.shuffle(rng);
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
