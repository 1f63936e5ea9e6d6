//! Per-simulation random sampling.
//!
//! Every stochastic draw in one simulation goes through a single [`SimRng`]
//! so that a fixed seed reproduces the run bit for bit. The spotting model
//! depends on a guaranteed draw order (parallel deltas, then perpendicular
//! deltas, then per-cell landing gates); callers sequence their draws, this
//! type only guarantees that equal seeds produce equal streams.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal, Normal};

/// Seeded generator owned by one simulation. Never shared across
/// simulations.
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: StdRng,
}

impl SimRng {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform draw in `[lo, hi)`; returns `lo` for an empty range.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.rng.gen_range(lo..hi)
        } else {
            lo
        }
    }

    /// Uniform integer draw in `[lo, hi]` inclusive.
    pub fn uniform_int(&mut self, lo: u32, hi: u32) -> u32 {
        if hi > lo {
            self.rng.gen_range(lo..=hi)
        } else {
            lo
        }
    }

    /// Normal draw; a non-positive sigma degenerates to the mean.
    pub fn normal(&mut self, mean: f64, sigma: f64) -> f64 {
        match Normal::new(mean, sigma) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => mean,
        }
    }

    /// Log-normal draw; `None` when the parameters are degenerate
    /// (non-positive or non-finite sigma), which the spotting model maps to
    /// a zero-displacement firebrand.
    pub fn lognormal(&mut self, mu: f64, sigma: f64) -> Option<f64> {
        if !(sigma > 0.0) || !sigma.is_finite() || !mu.is_finite() {
            return None;
        }
        LogNormal::new(mu, sigma)
            .ok()
            .map(|dist| dist.sample(&mut self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_seeds_give_equal_streams() {
        let mut a = SimRng::from_seed(1234);
        let mut b = SimRng::from_seed(1234);
        for _ in 0..100 {
            assert_eq!(a.unit(), b.unit());
        }
        assert_eq!(a.uniform_int(0, 1000), b.uniform_int(0, 1000));
        assert_eq!(a.normal(3.0, 2.0), b.normal(3.0, 2.0));
        assert_eq!(a.lognormal(0.5, 0.25), b.lognormal(0.5, 0.25));
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimRng::from_seed(1);
        let mut b = SimRng::from_seed(2);
        let same = (0..32).filter(|_| a.unit() == b.unit()).count();
        assert!(same < 32, "streams should not coincide");
    }

    #[test]
    fn uniform_respects_bounds() {
        let mut rng = SimRng::from_seed(7);
        for _ in 0..1000 {
            let v = rng.uniform(2.0, 5.0);
            assert!((2.0..5.0).contains(&v), "out of range: {v}");
        }
        assert_eq!(rng.uniform(3.0, 3.0), 3.0);
        assert_eq!(rng.uniform_int(4, 4), 4);
    }

    #[test]
    fn degenerate_lognormal_is_none() {
        let mut rng = SimRng::from_seed(9);
        assert!(rng.lognormal(1.0, 0.0).is_none());
        assert!(rng.lognormal(1.0, -2.0).is_none());
        assert!(rng.lognormal(1.0, f64::NAN).is_none());
        assert!(rng.lognormal(1.0, 0.5).unwrap() > 0.0);
    }

    #[test]
    fn degenerate_normal_returns_mean() {
        let mut rng = SimRng::from_seed(9);
        assert_eq!(rng.normal(2.5, 0.0), 2.5);
        assert_eq!(rng.normal(2.5, -1.0), 2.5);
    }
}
