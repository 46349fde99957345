//! Per-step randomness: shock and tolerance sample pools.
//!
//! Both samplers draw from a fixed pool precomputed at engine construction,
//! matching the reference model, so the shock percentile cutoff and the
//! per-step draws come from the same sample. Statistically this is
//! equivalent to fresh per-step distribution draws.

use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};

use crate::config::{ShockConfig, ToleranceConfig};
use crate::error::{Result, SimError};

/// A fixed, read-only pool of samples from some distribution.
///
/// Values are kept sorted; uniform index draws are order-independent and the
/// sort makes percentile lookups a plain index.
#[derive(Debug, Clone)]
pub struct SamplePool {
    values: Vec<f64>,
}

impl SamplePool {
    /// Draws `size` values from `dist` once. Fails with a `Config` error on
    /// an empty pool size.
    pub fn from_distribution<D, R>(dist: &D, size: usize, rng: &mut R) -> Result<Self>
    where
        D: Distribution<f64>,
        R: Rng,
    {
        if size == 0 {
            return Err(SimError::config("Sample pool must be nonempty"));
        }
        let mut values: Vec<f64> = (0..size).map(|_| dist.sample(rng)).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        Ok(Self { values })
    }

    /// Uniform draw of one pool value.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        self.values[rng.gen_range(0..self.values.len())]
    }

    /// Nearest-rank percentile of the pool, `p` in (0, 100].
    #[must_use]
    pub fn percentile(&self, p: f64) -> f64 {
        let n = self.values.len();
        let rank = ((p / 100.0) * n as f64).ceil() as usize;
        self.values[rank.clamp(1, n) - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lognormal shock intensity pool plus its percentile cutoff.
///
/// One value is drawn per step; a draw strictly above the cutoff makes that
/// step a shock step.
#[derive(Debug, Clone)]
pub struct ShockSampler {
    pool: SamplePool,
    threshold: f64,
}

impl ShockSampler {
    pub fn new<R: Rng>(config: &ShockConfig, rng: &mut R) -> Result<Self> {
        let dist = LogNormal::new(config.mu, config.sigma)
            .map_err(|e| SimError::config(format!("Invalid shock distribution: {e}")))?;
        let pool = SamplePool::from_distribution(&dist, config.pool_size, rng)?;
        let threshold = pool.percentile(config.percentile);
        Ok(Self { pool, threshold })
    }

    /// Uniform draw of one latent shock intensity from the pool.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        self.pool.draw(rng)
    }

    /// True iff `value` exceeds the pool's percentile cutoff.
    #[must_use]
    pub fn is_shock(&self, value: f64) -> bool {
        value > self.threshold
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn pool(&self) -> &SamplePool {
        &self.pool
    }
}

/// Normal tolerance threshold pool, used only in non-shock steps.
#[derive(Debug, Clone)]
pub struct ToleranceSampler {
    pool: SamplePool,
}

impl ToleranceSampler {
    pub fn new<R: Rng>(config: &ToleranceConfig, rng: &mut R) -> Result<Self> {
        let dist = Normal::new(config.mean, config.std_dev)
            .map_err(|e| SimError::config(format!("Invalid tolerance distribution: {e}")))?;
        let pool = SamplePool::from_distribution(&dist, config.pool_size, rng)?;
        Ok(Self { pool })
    }

    /// Uniform draw of one tolerance threshold from the pool.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        self.pool.draw(rng)
    }

    #[must_use]
    pub fn pool(&self) -> &SamplePool {
        &self.pool
    }
}
