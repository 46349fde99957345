//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to a `config.toml` file.
//! All parameters of the segregation model can be customized through this
//! system; defaults reproduce the reference calibration (51×51 torus, three
//! populations plus empty lots at 0.4/0.3/0.2/0.1, radius-2 neighborhoods,
//! lognormal(-2, 0.65) shocks cut at the 99th percentile).
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [grid]
//! rows = 51
//! cols = 51
//! seed = 42
//!
//! [shock]
//! mu = -2.0
//! sigma = 0.65
//! percentile = 99.0
//!
//! [tolerance]
//! mean = 0.3
//! std_dev = 0.05
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(SimError::Config(format!($($arg)*)));
        }
    };
}

/// Grid dimensions and RNG seeding.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// Seed for the run's RNG. `None` falls back to 0 for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 51,
            cols: 51,
            seed: None,
        }
    }
}

/// Category set and initial proportions.
///
/// Cell codes run `0..proportions.len()`; exactly one of them is the empty
/// lot. The reference calibration samples four categories with weights
/// 0.4/0.3/0.2/0.1 and treats the last one as empty, but which code plays
/// that role is deliberately a configuration choice.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PopulationConfig {
    /// Initial proportion per category code, must sum to 1.
    pub proportions: Vec<f64>,
    /// The code reserved for empty lots.
    pub empty_code: u8,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            proportions: vec![0.4, 0.3, 0.2, 0.1],
            empty_code: 3,
        }
    }
}

/// Shock distribution parameters.
///
/// A latent shock intensity is drawn once per step from a lognormal pool;
/// a step whose draw exceeds the pool's `percentile` cutoff runs under the
/// inverted tolerance rule.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ShockConfig {
    /// Location parameter of the lognormal.
    pub mu: f64,
    /// Scale parameter of the lognormal.
    pub sigma: f64,
    /// Number of values in the precomputed sample pool.
    pub pool_size: usize,
    /// Percentile of the pool that marks a step as a shock, in (0, 100].
    pub percentile: f64,
}

impl Default for ShockConfig {
    fn default() -> Self {
        Self {
            mu: -2.0,
            sigma: 0.65,
            pool_size: 10_000,
            percentile: 99.0,
        }
    }
}

/// Tolerance distribution parameters (non-shock steps only).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToleranceConfig {
    pub mean: f64,
    pub std_dev: f64,
    /// Number of values in the precomputed sample pool.
    pub pool_size: usize,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            mean: 0.3,
            std_dev: 0.05,
            pool_size: 10_000,
        }
    }
}

/// Policy for occupied cells with zero occupied neighbors.
///
/// The similarity ratio is undefined there; the engine must take an explicit
/// branch instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IsolatedPolicy {
    /// An agent with no neighbors has nobody to be unhappy about.
    #[default]
    Happy,
    /// Isolated agents always relocate.
    Unhappy,
}

/// Top-level simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub population: PopulationConfig,
    pub shock: ShockConfig,
    pub tolerance: ToleranceConfig,
    /// Chebyshev radius of the neighborhood (2 in the reference model).
    pub radius: usize,
    /// Total number of steps in a run.
    pub steps: u64,
    pub isolated: IsolatedPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            population: PopulationConfig::default(),
            shock: ShockConfig::default(),
            tolerance: ToleranceConfig::default(),
            radius: 2,
            steps: 500,
            isolated: IsolatedPolicy::default(),
        }
    }
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or a `Config` error
    /// describing the first validation failure. Called by
    /// [`Engine::new`](crate::engine::Engine::new) so that bad configuration
    /// never reaches the step loop.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.grid.rows > 0, "Grid rows must be positive");
        ensure!(self.grid.cols > 0, "Grid cols must be positive");
        ensure!(self.grid.rows <= 1000, "Grid rows too large (max 1000)");
        ensure!(self.grid.cols <= 1000, "Grid cols too large (max 1000)");

        let props = &self.population.proportions;
        ensure!(
            props.len() >= 2,
            "Need at least two categories (one population plus the empty lot)"
        );
        ensure!(
            props.len() <= u8::MAX as usize,
            "Too many categories (max 255)"
        );
        ensure!(
            props.iter().all(|p| *p >= 0.0 && p.is_finite()),
            "Proportions must be finite and non-negative"
        );
        let sum: f64 = props.iter().sum();
        ensure!(
            (sum - 1.0).abs() < 1e-6,
            "Proportions must sum to 1 (got {sum})"
        );
        ensure!(
            (self.population.empty_code as usize) < props.len(),
            "Empty code {} out of range for {} categories",
            self.population.empty_code,
            props.len()
        );

        ensure!(self.radius >= 1, "Neighborhood radius must be at least 1");

        ensure!(self.shock.sigma > 0.0, "Shock sigma must be positive");
        ensure!(self.shock.pool_size > 0, "Shock pool must be nonempty");
        ensure!(
            self.shock.percentile > 0.0 && self.shock.percentile <= 100.0,
            "Shock percentile must be in (0, 100]"
        );

        ensure!(
            self.tolerance.std_dev >= 0.0,
            "Tolerance std_dev must be non-negative"
        );
        ensure!(
            self.tolerance.pool_size > 0,
            "Tolerance pool must be nonempty"
        );

        Ok(())
    }

    /// Loads and validates configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of category codes, including the empty lot.
    #[must_use]
    pub fn categories(&self) -> usize {
        self.population.proportions.len()
    }

    /// SHA-256 fingerprint of the model parameters, for run provenance logs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.grid).as_bytes());
        hasher.update(format!("{:?}", self.population).as_bytes());
        hasher.update(format!("{:?}", self.shock).as_bytes());
        hasher.update(format!("{:?}", self.tolerance).as_bytes());
        hasher.update(format!("{:?}", (self.radius, self.steps, self.isolated)).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rows_rejected() {
        let config = SimConfig {
            grid: GridConfig {
                rows: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_proportions_must_sum_to_one() {
        let config = SimConfig {
            population: PopulationConfig {
                proportions: vec![0.5, 0.4],
                empty_code: 1,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_code_out_of_range() {
        let config = SimConfig {
            population: PopulationConfig {
                proportions: vec![0.5, 0.5],
                empty_code: 2,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_shock_pool_rejected() {
        let config = SimConfig {
            shock: ShockConfig {
                pool_size: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_percentile() {
        let config = SimConfig {
            shock: ShockConfig {
                percentile: 101.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_override() {
        let content = r#"
            radius = 1
            steps = 50
            isolated = "Happy"

            [grid]
            rows = 20
            cols = 20
            seed = 7

            [population]
            proportions = [0.45, 0.45, 0.1]
            empty_code = 2

            [shock]
            mu = -2.0
            sigma = 0.65
            pool_size = 1000
            percentile = 99.0

            [tolerance]
            mean = 0.25
            std_dev = 0.05
            pool_size = 1000
        "#;
        let config = SimConfig::from_toml(content).unwrap();
        assert_eq!(config.grid.rows, 20);
        assert_eq!(config.population.empty_code, 2);
        assert_eq!(config.radius, 1);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = SimConfig::default();
        let config2 = SimConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let changed = SimConfig {
            radius: 1,
            ..Default::default()
        };
        assert_ne!(config1.fingerprint(), changed.fingerprint());
    }
}
