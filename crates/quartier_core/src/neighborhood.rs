//! Wrapped Chebyshev neighborhoods and similarity counts.
//!
//! The reference model evaluates second-order (radius-2) neighborhoods: the
//! 24 cells within Chebyshev distance 2 of a target, excluding the target,
//! with both axes wrapping. Radius 1 yields the classic Moore neighborhood
//! and stays available through the `radius` parameter.

use std::collections::HashSet;

use crate::grid::Grid;

/// All positions within Chebyshev distance `radius` of `(row, col)` on an
/// `rows × cols` torus, excluding the center.
///
/// Coordinates are deduplicated: once the radius reaches half a grid
/// dimension, wraparound aliases distinct offsets onto the same cell, and a
/// naive offset list would double-count it.
#[must_use]
pub fn neighbors(
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
    radius: usize,
) -> HashSet<(usize, usize)> {
    let r = radius as isize;
    let mut out = HashSet::new();
    for dr in -r..=r {
        for dc in -r..=r {
            if dr == 0 && dc == 0 {
                continue;
            }
            let nr = (row as isize + dr).rem_euclid(rows as isize) as usize;
            let nc = (col as isize + dc).rem_euclid(cols as isize) as usize;
            if (nr, nc) != (row, col) {
                out.insert((nr, nc));
            }
        }
    }
    out
}

/// Counts same-type and occupied cells among the wrapped neighbors of
/// `(row, col)`.
///
/// Returns `(alike, occupied_neighbors)`. The center is expected to be
/// occupied; the step engine never asks about empty cells.
///
/// While the `(2·radius + 1)` window fits inside both grid dimensions,
/// distinct offsets land on distinct cells and the scan walks them directly;
/// only oversized windows pay for the deduplicated set.
#[must_use]
pub fn similarity_counts(grid: &Grid, row: usize, col: usize, radius: usize) -> (usize, usize) {
    let center = grid.code_at(row, col);
    let mut alike = 0;
    let mut occupied = 0;

    let window = 2 * radius + 1;
    if window <= grid.rows() && window <= grid.cols() {
        let r = radius as isize;
        for dr in -r..=r {
            for dc in -r..=r {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let code = grid.code_at_wrapped(row as isize + dr, col as isize + dc);
                if code == grid.empty_code() {
                    continue;
                }
                occupied += 1;
                if code == center {
                    alike += 1;
                }
            }
        }
    } else {
        for (nr, nc) in neighbors(grid.rows(), grid.cols(), row, col, radius) {
            let code = grid.code_at(nr, nc);
            if code == grid.empty_code() {
                continue;
            }
            occupied += 1;
            if code == center {
                alike += 1;
            }
        }
    }
    (alike, occupied)
}
