//! Toroidal grid of category codes.
//!
//! The grid is the only mutable state of the simulation. Each cell holds one
//! small integer code: a population type or the reserved empty-lot code. Both
//! axes wrap, and [`Grid::relocate`] is the sole mutation primitive, so the
//! multiset of codes over the whole grid is invariant for the life of a run.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// An `rows × cols` torus of category codes, stored row-major.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<u8>,
    rows: usize,
    cols: usize,
    empty_code: u8,
}

impl Grid {
    /// Fills a new grid by sampling each cell independently from a
    /// categorical distribution over the codes `0..proportions.len()`.
    ///
    /// Fails with a `Config` error if the proportions do not sum to ~1, if
    /// the empty code is out of range, or if a dimension is zero.
    pub fn initialize<R: Rng>(
        rows: usize,
        cols: usize,
        proportions: &[f64],
        empty_code: u8,
        rng: &mut R,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SimError::config("Grid dimensions must be positive"));
        }
        if (empty_code as usize) >= proportions.len() {
            return Err(SimError::config(format!(
                "Empty code {} out of range for {} categories",
                empty_code,
                proportions.len()
            )));
        }
        let sum: f64 = proportions.iter().sum();
        if (sum - 1.0).abs() >= 1e-6 {
            return Err(SimError::config(format!(
                "Proportions must sum to 1 (got {sum})"
            )));
        }
        let dist = WeightedIndex::new(proportions)
            .map_err(|e| SimError::config(format!("Invalid proportions: {e}")))?;

        let cells = (0..rows * cols).map(|_| dist.sample(rng) as u8).collect();
        Ok(Self {
            cells,
            rows,
            cols,
            empty_code,
        })
    }

    /// Builds a grid from explicit cell codes, for fixtures and resumed runs.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<u8>, empty_code: u8) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SimError::config("Grid dimensions must be positive"));
        }
        if cells.len() != rows * cols {
            return Err(SimError::config(format!(
                "Expected {} cells for a {}x{} grid, got {}",
                rows * cols,
                rows,
                cols,
                cells.len()
            )));
        }
        Ok(Self {
            cells,
            rows,
            cols,
            empty_code,
        })
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn empty_code(&self) -> u8 {
        self.empty_code
    }

    /// Raw row-major cell codes, for snapshots and renderers.
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Code at an in-range position.
    #[must_use]
    pub fn code_at(&self, row: usize, col: usize) -> u8 {
        self.cells[self.index(row, col)]
    }

    /// Code at a possibly out-of-range position, wrapped on both axes.
    #[must_use]
    pub fn code_at_wrapped(&self, row: isize, col: isize) -> u8 {
        let r = row.rem_euclid(self.rows as isize) as usize;
        let c = col.rem_euclid(self.cols as isize) as usize;
        self.cells[self.index(r, c)]
    }

    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.code_at(row, col) != self.empty_code
    }

    /// Number of cells holding a population code.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != self.empty_code).count()
    }

    /// All empty-lot positions, in row-major order.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, code)| **code == self.empty_code)
            .map(|(i, _)| (i / self.cols, i % self.cols))
            .collect()
    }

    /// Positions of all occupied cells, in row-major order.
    #[must_use]
    pub fn occupied_positions(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, code)| **code != self.empty_code)
            .map(|(i, _)| (i / self.cols, i % self.cols))
            .collect()
    }

    /// Moves the occupant at `from` into the empty lot at `to`, marking the
    /// vacated cell empty. The only mutation primitive on the grid.
    ///
    /// Fails with `InvalidMove` if `from` is empty or `to` is occupied; the
    /// step engine's own bookkeeping makes those cases unreachable.
    pub fn relocate(&mut self, from: (usize, usize), to: (usize, usize)) -> Result<()> {
        if !self.is_occupied(from.0, from.1) {
            return Err(SimError::invalid_move(from, to, "source cell is empty"));
        }
        if self.is_occupied(to.0, to.1) {
            return Err(SimError::invalid_move(from, to, "target cell is occupied"));
        }
        let code = self.code_at(from.0, from.1);
        let from_idx = self.index(from.0, from.1);
        let to_idx = self.index(to.0, to.1);
        self.cells[to_idx] = code;
        self.cells[from_idx] = self.empty_code;
        Ok(())
    }

    /// Per-code cell counts, indexed by code. Conserved across steps.
    #[must_use]
    pub fn code_census(&self) -> Vec<usize> {
        let max_code = self.cells.iter().copied().max().unwrap_or(0) as usize;
        let mut census = vec![0usize; max_code.max(self.empty_code as usize) + 1];
        for code in &self.cells {
            census[*code as usize] += 1;
        }
        census
    }
}
