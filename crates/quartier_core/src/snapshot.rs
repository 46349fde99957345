//! Read-only per-step snapshots for external consumers.
//!
//! Plotting and animation layers consume these; they never mutate engine
//! state.

use serde::{Deserialize, Serialize};

/// Everything an external renderer needs about one completed step: the grid
/// contents, the happiness series so far, and the step's sampled shock
/// intensity (used to mark shock steps on a distribution plot).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StepSnapshot {
    /// Number of completed steps; snapshots are emitted post-relocation.
    pub tick: u64,
    pub rows: usize,
    pub cols: usize,
    /// Row-major category codes.
    pub cells: Vec<u8>,
    pub empty_code: u8,
    /// Happiness percentages up to and including this step.
    pub happiness: Vec<f64>,
    /// The latent shock intensity sampled this step.
    pub shock_value: f64,
    /// Whether this step ran under the shock rule.
    pub shocked: bool,
}
