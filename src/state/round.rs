//! Random Senator selection
//!
//! Randomness is injected through [`RandomIndex`] so sessions can be driven
//! deterministically in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed indices
pub trait RandomIndex: Send {
    /// Pick an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

impl RandomIndex for StdRng {
    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Production randomness, seeded from the OS
pub fn os_seeded() -> Box<dyn RandomIndex> {
    Box::new(StdRng::from_os_rng())
}

/// Reproducible randomness for a given seed
pub fn seeded(seed: u64) -> Box<dyn RandomIndex> {
    Box::new(StdRng::seed_from_u64(seed))
}

/// Always picks the first candidate
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstIndex;

impl RandomIndex for FirstIndex {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}
