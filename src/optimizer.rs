//! Density-driven profile construction.
//!
//! Colors are first laid out row-major by descending normalized density. Row
//! zero is then rebuilt as a greedy nearest-neighbour chain, and every
//! following row is rebuilt greedily to resemble the row above it. All moves
//! are swaps inside one row, so the layout stays a bijection throughout.
//!
//! Row propagation performs about `side^3 / 2` distance evaluations: several
//! minutes to hours at full depth. Use a reduced [`Geometry`] for quick runs.

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::color::{distance, Geometry};
use crate::error::{Error, Result};
use crate::iter_utils::first_min_by_key;
use crate::profile::Profile;

const ROW_LOG_INTERVAL: usize = 256;

#[derive(Debug, Clone, Copy)]
struct Cell {
    density: f64,
    color: u32,
}

/// Position-indexed view of a profile under construction.
#[derive(Debug)]
struct InverseProfile {
    geometry: Geometry,
    cells: Vec<Cell>,
}

impl InverseProfile {
    /// Ranks colors by density and assigns them row-major, densest first.
    fn seed(geometry: Geometry, normalized: &[f64]) -> Self {
        let mut cells: Vec<Cell> = normalized
            .par_iter()
            .enumerate()
            .map(|(i, &density)| Cell { density, color: i as u32 })
            .collect();
        cells.par_sort_by(|a, b| a.density.total_cmp(&b.density));
        cells.reverse();
        InverseProfile { geometry, cells }
    }

    #[inline(always)]
    fn levels(&self, pos: usize) -> (u32, u32, u32) {
        self.geometry.levels_of(self.cells[pos].color as usize)
    }

    /// Greedy nearest-neighbour chain along row zero.
    fn smooth_first_row(&mut self) {
        let side = self.geometry.side();
        for x in 0..side.saturating_sub(2) {
            let current = self.levels(x);
            let next = first_min_by_key(x + 1..side, |x2| distance(current, self.levels(x2)));
            if let Some(x2) = next {
                self.cells.swap(x + 1, x2);
            }
        }
    }

    /// Rebuilds each row after the first to follow the row above it.
    fn propagate_rows(&mut self, cancel: Option<&AtomicBool>) -> Result<()> {
        let side = self.geometry.side();
        for y in 0..side - 1 {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                return Err(Error::Cancelled);
            }
            if y % ROW_LOG_INTERVAL == 0 {
                debug!(row = y, rows = side, "propagating rows");
            }

            self.propagate_row(y);
        }
        Ok(())
    }

    /// Rebuilds row `y + 1` from row `y`. Neighbours past either edge are
    /// clamped to the edge column.
    fn propagate_row(&mut self, y: usize) {
        let side = self.geometry.side();
        let above = y * side;
        let below = above + side;
        for x in 0..side {
            let left = self.levels(above + x.saturating_sub(1));
            let middle = self.levels(above + x);
            let right = self.levels(above + (x + 1).min(side - 1));
            // Sum instead of mean: same minimum, no rounding.
            let best = first_min_by_key(x..side, |x2| {
                let c = self.levels(below + x2);
                distance(left, c) + distance(middle, c) + distance(right, c)
            });
            if let Some(x2) = best {
                self.cells.swap(below + x, below + x2);
            }
        }
    }

    fn into_profile(self) -> Profile {
        Profile::from_colors(self.geometry, self.cells.into_iter().map(|c| c.color).collect())
    }
}

/// Builds an optimized profile from normalized densities.
///
/// `normalized` must hold one value per color of `geometry`. When `cancel` is
/// set while rows are being propagated the work is abandoned and
/// [`Error::Cancelled`] is returned.
pub fn optimize(
    geometry: Geometry,
    normalized: &[f64],
    cancel: Option<&AtomicBool>,
) -> Result<Profile> {
    debug_assert_eq!(normalized.len(), geometry.color_count());

    info!(colors = geometry.color_count(), side = geometry.side(), "creating profile");
    let mut inverse = InverseProfile::seed(geometry, normalized);

    info!("optimizing profile");
    inverse.smooth_first_row();
    inverse.propagate_rows(cancel)?;

    info!("profile optimized");
    Ok(inverse.into_profile())
}
