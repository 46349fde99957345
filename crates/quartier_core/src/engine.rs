//! The step engine: per-step sampling, classification and relocation.
//!
//! One [`Engine::step`] call advances the simulation by a single discrete
//! time step:
//!
//! 1. draw a tolerance threshold and a latent shock intensity;
//! 2. classify every occupied cell happy/unhappy under the active rule
//!    (read-only over the grid, parallelizable);
//! 3. append the happiness percentage to the log;
//! 4. shuffle the unhappy cells and relocate each into a uniformly chosen
//!    empty lot, re-scanning the live grid between relocations.
//!
//! Steps are strictly sequential: relocation order matters because each move
//! changes the empty-lot set the next move draws from.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{IsolatedPolicy, SimConfig};
use crate::error::Result;
use crate::grid::Grid;
use crate::metrics::HappinessLog;
use crate::neighborhood::similarity_counts;
use crate::sampling::{ShockSampler, ToleranceSampler};
use crate::snapshot::StepSnapshot;

/// During a shock the tolerance rule inverts: cells want mixed surroundings,
/// and a similarity ratio at or below this floor, or a fully uniform
/// neighborhood, makes them unhappy.
pub const SHOCK_RATIO_FLOOR: f64 = 0.7;

/// Interval between progress log lines.
const LOG_INTERVAL: u64 = 100;

/// Happy/unhappy decision for one occupied cell.
///
/// In a normal step a cell is happy iff `alike / total` strictly exceeds the
/// tolerance threshold. In a shock step it is happy iff the ratio lies
/// strictly between [`SHOCK_RATIO_FLOOR`] and 1: a fully identical
/// neighborhood (ratio exactly 1) is not happy during a shock. Cells with no
/// occupied neighbors take the configured isolated-cell policy.
#[must_use]
pub fn happiness_rule(
    alike: usize,
    total: usize,
    tolerance: f64,
    shocked: bool,
    isolated: IsolatedPolicy,
) -> bool {
    if total == 0 {
        return isolated == IsolatedPolicy::Happy;
    }
    let ratio = alike as f64 / total as f64;
    if shocked {
        ratio > SHOCK_RATIO_FLOOR && ratio < 1.0
    } else {
        ratio > tolerance
    }
}

/// Summary of one completed step.
#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    /// Step number, 1-based (count of completed steps).
    pub tick: u64,
    pub shock_value: f64,
    pub shocked: bool,
    /// `100 × happy / occupied` for this step.
    pub happiness: f64,
    /// Number of cells actually moved during relocation.
    pub relocated: usize,
}

/// The simulation engine: grid, samplers, RNG and happiness bookkeeping.
pub struct Engine {
    config: SimConfig,
    grid: Grid,
    rng: ChaCha8Rng,
    shock: ShockSampler,
    tolerance: ToleranceSampler,
    happiness: HappinessLog,
    tick: u64,
    last_shock_value: f64,
    last_shocked: bool,
}

impl Engine {
    /// Validates the configuration, seeds the RNG, builds both sample pools
    /// and draws the initial grid.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.grid.seed.unwrap_or(0));
        let shock = ShockSampler::new(&config.shock, &mut rng)?;
        let tolerance = ToleranceSampler::new(&config.tolerance, &mut rng)?;
        let grid = Grid::initialize(
            config.grid.rows,
            config.grid.cols,
            &config.population.proportions,
            config.population.empty_code,
            &mut rng,
        )?;
        Ok(Self {
            config,
            grid,
            rng,
            shock,
            tolerance,
            happiness: HappinessLog::new(),
            tick: 0,
            last_shock_value: 0.0,
            last_shocked: false,
        })
    }

    /// Builds an engine around an existing grid (fixtures, resumed runs).
    ///
    /// The grid's dimensions and empty code take precedence over the
    /// config's; everything else still validates up front.
    pub fn from_grid(mut config: SimConfig, grid: Grid) -> Result<Self> {
        config.grid.rows = grid.rows();
        config.grid.cols = grid.cols();
        config.population.empty_code = grid.empty_code();
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.grid.seed.unwrap_or(0));
        let shock = ShockSampler::new(&config.shock, &mut rng)?;
        let tolerance = ToleranceSampler::new(&config.tolerance, &mut rng)?;
        Ok(Self {
            config,
            grid,
            rng,
            shock,
            tolerance,
            happiness: HappinessLog::new(),
            tick: 0,
            last_shock_value: 0.0,
            last_shocked: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn happiness(&self) -> &HappinessLog {
        &self.happiness
    }

    /// Number of completed steps.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.tick >= self.config.steps
    }

    #[must_use]
    pub fn shock_sampler(&self) -> &ShockSampler {
        &self.shock
    }

    /// Advances the simulation by one step.
    pub fn step(&mut self) -> Result<StepReport> {
        let tolerance = self.tolerance.draw(&mut self.rng);
        let shock_value = self.shock.draw(&mut self.rng);
        let shocked = self.shock.is_shock(shock_value);
        self.advance(tolerance, shock_value, shocked)
    }

    /// One step with the per-step draws fixed by the caller. `step` is the
    /// only production caller; tests use it to pin a branch.
    pub(crate) fn advance(
        &mut self,
        tolerance: f64,
        shock_value: f64,
        shocked: bool,
    ) -> Result<StepReport> {
        let occupied = self.grid.occupied_positions();
        let unhappy = self.classify(&occupied, tolerance, shocked);

        let happiness = if occupied.is_empty() {
            // Vacuously happy; keeps NaN out of the series.
            100.0
        } else {
            100.0 * (occupied.len() - unhappy.len()) as f64 / occupied.len() as f64
        };
        self.happiness.append(happiness);

        let relocated = self.relocate_all(unhappy)?;

        self.tick += 1;
        self.last_shock_value = shock_value;
        self.last_shocked = shocked;

        if shocked {
            tracing::info!(
                tick = self.tick,
                shock_value = shock_value,
                happiness = happiness,
                "Shock step"
            );
        } else if self.tick % LOG_INTERVAL == 0 {
            tracing::info!(
                tick = self.tick,
                happiness = happiness,
                relocated = relocated,
                "Simulation step"
            );
        }

        Ok(StepReport {
            tick: self.tick,
            shock_value,
            shocked,
            happiness,
            relocated,
        })
    }

    /// Classifies the occupied cells and returns the unhappy ones in
    /// evaluation (row-major) order.
    ///
    /// This pass only reads the grid, so it parallelizes safely; relocation
    /// never does.
    fn classify(
        &self,
        occupied: &[(usize, usize)],
        tolerance: f64,
        shocked: bool,
    ) -> Vec<(usize, usize)> {
        let decide = |&(row, col): &(usize, usize)| -> bool {
            let (alike, total) = similarity_counts(&self.grid, row, col, self.config.radius);
            happiness_rule(alike, total, tolerance, shocked, self.config.isolated)
        };

        #[cfg(feature = "parallel")]
        let flags: Vec<bool> = occupied.par_iter().map(decide).collect();
        #[cfg(not(feature = "parallel"))]
        let flags: Vec<bool> = occupied.iter().map(decide).collect();

        occupied
            .iter()
            .zip(flags)
            .filter(|(_, happy)| !happy)
            .map(|(pos, _)| *pos)
            .collect()
    }

    /// Shuffles the unhappy cells and moves each into a uniformly chosen
    /// empty lot, re-scanning the grid's empty set between moves. Cells stay
    /// put when no empty lot exists.
    fn relocate_all(&mut self, mut unhappy: Vec<(usize, usize)>) -> Result<usize> {
        unhappy.shuffle(&mut self.rng);
        let mut relocated = 0;
        for cell in unhappy {
            let empties = self.grid.empty_positions();
            if empties.is_empty() {
                continue;
            }
            let target = empties[self.rng.gen_range(0..empties.len())];
            self.grid.relocate(cell, target)?;
            relocated += 1;
        }
        Ok(relocated)
    }

    /// Read-only snapshot of the last completed step, for renderers and
    /// recorders. Meaningful once at least one step has run.
    #[must_use]
    pub fn snapshot(&self) -> StepSnapshot {
        StepSnapshot {
            tick: self.tick,
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            cells: self.grid.cells().to_vec(),
            empty_code: self.grid.empty_code(),
            happiness: self.happiness.as_slice().to_vec(),
            shock_value: self.last_shock_value,
            shocked: self.last_shocked,
        }
    }
}
