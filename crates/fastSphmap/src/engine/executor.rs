//! Parallel deposition engine for kernel smoothing.
//!
//! ## Purpose
//!
//! This module provides the parallel deposition pass that is injected into
//! the `sphmap` execution engine. It spreads the accumulation of many sources
//! over all CPU cores.
//!
//! ## Design notes
//!
//! * **Implementation**: Drop-in replacement for the serial `accumulate` pass
//!   (same signature, same `DepositPassFn` hook).
//! * **Row bands**: The image is split into disjoint bands of whole rows; each
//!   band is owned by one task, so no two tasks write the same cell.
//! * **Reproducibility**: Every band visits the sources in input order, so
//!   each cell receives its contributions in exactly the serial order and the
//!   result is bit-identical to the serial pass.
//! * **Generics**: Generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Band clipping**: A source's row window is intersected with the band;
//!   sources that miss the band cost one window computation.
//!
//! ## Invariants
//!
//! * Bands cover rows `0..ny` exactly once.
//! * Cell `(i, j)` lives at `i * ny + j` in both `z` and the grid buffers.
//!
//! ## Non-goals
//!
//! * This module does not validate inputs (handled by `sphmap`'s validator).
//! * This module does not partition non-square grids; they take the serial pass.

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::prelude::*;
#[cfg(feature = "cpu")]
use sphmap::internals::algorithms::deposit::accumulate;

// External dependencies
use num_traits::Float;

// Export dependencies from sphmap crate
use sphmap::internals::algorithms::deposit::source_window;
use sphmap::internals::math::kernel::CubicSpline;

// Row bands per worker thread.
#[cfg(feature = "cpu")]
const BANDS_PER_THREAD: usize = 4;

// ============================================================================
// Parallel Deposition Pass
// ============================================================================

/// Deposit every source onto the grid in parallel, adding into `z`.
///
/// Produces exactly the values of the serial `accumulate` pass.
#[allow(clippy::too_many_arguments)]
#[cfg(feature = "cpu")]
pub fn deposit_pass_parallel<T>(
    x_grid: &[T],
    y_grid: &[T],
    z: &mut [T],
    nx: usize,
    ny: usize,
    x0: &[T],
    y0: &[T],
    weights: &[T],
    hsml: &[T],
    num_rhalfs: T,
) where
    T: Float + Send + Sync,
{
    let nsources = x0.len();
    if nsources == 0 || ny == 0 {
        return;
    }

    // Rows overlap in the stride-ny layout unless the grid is square.
    if nx != ny || z.len() < nx * ny {
        accumulate(x_grid, y_grid, z, nx, ny, x0, y0, weights, hsml, num_rhalfs);
        return;
    }

    let bands = (rayon::current_num_threads() * BANDS_PER_THREAD).clamp(1, ny);
    let rows_per_band = ny.div_ceil(bands);

    tracing::debug!(
        sources = nsources,
        bands,
        rows_per_band,
        "parallel deposition"
    );

    z[..nx * ny]
        .par_chunks_mut(rows_per_band * ny)
        .enumerate()
        .for_each(|(band, z_band)| {
            let first_row = band * rows_per_band;
            let last_row = first_row + z_band.len() / ny - 1;
            deposit_band(
                x_grid, y_grid, z_band, first_row, last_row, nx, ny, x0, y0, weights, hsml,
                num_rhalfs,
            );
        });
}

/// Deposit every source into rows `first_row..=last_row` only.
///
/// `z_band` starts at row `first_row`.
#[allow(clippy::too_many_arguments, clippy::needless_range_loop)]
pub fn deposit_band<T: Float>(
    x_grid: &[T],
    y_grid: &[T],
    z_band: &mut [T],
    first_row: usize,
    last_row: usize,
    nx: usize,
    ny: usize,
    x0: &[T],
    y0: &[T],
    weights: &[T],
    hsml: &[T],
    num_rhalfs: T,
) {
    for k in 0..x0.len() {
        let h = CubicSpline::support_radius(hsml[k]);
        let Some(window) = source_window(x0[k], y0[k], h, nx, ny, num_rhalfs) else {
            continue;
        };

        let imin = window.imin.max(first_row);
        let imax = window.imax.min(last_row);
        if imax < imin {
            continue;
        }

        for i in imin..=imax {
            let row = i * ny;
            let local = (i - first_row) * ny;
            for j in window.jmin..=window.jmax {
                let n = row + j;
                let dx = x_grid[n] - x0[k];
                let dy = y_grid[n] - y0[k];
                let r = (dx * dx + dy * dy).sqrt();
                let cell = &mut z_band[local + j];
                *cell = *cell + weights[k] * CubicSpline::evaluate(r, h);
            }
        }
    }
}
