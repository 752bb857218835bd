//! Random index sources. Verse selection only ever needs "an index below n",
//! so that is the whole seam; tests swap in [`SequenceRandom`] for a scripted
//! sequence.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Return a value in `0..upper`. Callers never pass `upper == 0`.
    fn next_index(&mut self, upper: usize) -> usize;
}

/// Entropy-seeded generator used by the binary.
pub struct ThreadRandom {
    rng: StdRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator, handy for demos and property-style tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}

/// Replays a fixed list of values, cycling once exhausted. Values are reduced
/// modulo `upper` so a script stays valid for any catalog size.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: VecDeque<usize>,
}

impl SequenceRandom {
    pub fn new(values: impl IntoIterator<Item = usize>) -> Self {
        let values: VecDeque<usize> = values.into_iter().collect();
        Self { values }
    }
}

impl RandomSource for SequenceRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        match self.values.pop_front() {
            Some(value) => {
                self.values.push_back(value);
                value % upper
            }
            None => 0,
        }
    }
}
