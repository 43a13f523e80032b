//! Seedable random source shared by one simulation.
//!
//! Every random decision in a match (intake success, shot accuracy, pass
//! scatter, spawn kicks, AI soft-exclusion and recovery direction) draws from
//! the same `SimRng`, so a seed fully determines a match.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SimRng {
    inner: StdRng,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// True with probability `p`. Values outside [0, 1] saturate.
    pub fn chance(&mut self, p: f32) -> bool {
        if p >= 1.0 {
            true
        } else if p <= 0.0 || p.is_nan() {
            false
        } else {
            self.inner.gen::<f32>() < p
        }
    }

    /// Uniform sample in `[lo, hi)`; returns `lo` for an empty range.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo {
            self.inner.gen_range(lo..hi)
        } else {
            lo
        }
    }

    /// Either `1.0` or `-1.0`
    pub fn sign(&mut self) -> f32 {
        if self.inner.gen::<bool>() {
            1.0
        } else {
            -1.0
        }
    }
}
