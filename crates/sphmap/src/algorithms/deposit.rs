//! Kernel deposition of point sources onto a pixel grid.
//!
//! ## Purpose
//!
//! This module is the accumulator: for every source it derives the clipped
//! pixel window covering the source's support and adds
//! `weight * W(r, h)` to each cell inside it.
//!
//! ## Design notes
//!
//! * **Layout**: Cell `(i, j)` lives at `n = i * ny + j` (row stride `ny`).
//! * **Axis pairing**: Rows (`imin..=imax`) come from `y0 -/+ h` mapped with
//!   `ny`; columns (`jmin..=jmax`) come from `x0 -/+ h` mapped with `nx`.
//! * **Inclusive bounds**: Both window ends are visited.
//! * **Ordering**: Sources are applied in index order, cells in row-major
//!   order. Floating-point sums depend on this order.
//! * **Allocation**: None. All working state is scalar.
//!
//! ## Key concepts
//!
//! * **Support radius**: `h = 2.8 * hsml[k]`.
//! * **Sample coordinates**: `(X[n], Y[n])` is where the field is sampled for
//!   cell `n`; the distance to the source is measured from there.
//!
//! ## Invariants
//!
//! * `z` is only ever added to; it is not cleared here.
//! * A source whose window is empty after clipping costs O(1) and adds nothing.
//! * There is no per-cell `r > h` early exit; the kernel is zero there.
//!
//! ## Non-goals
//!
//! * This module does not validate inputs. Slices shorter than the sources or
//!   the grid imply, or non-positive smoothing lengths, give unspecified
//!   values; out-of-range cells panic on indexing rather than corrupt memory.
//! * This module does not schedule work across threads.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::kernel::CubicSpline;
use crate::math::pixel::rhalfs_to_pixels;
use crate::primitives::window::PixelWindow;

// ============================================================================
// Per-Source Helpers
// ============================================================================

/// Clipped pixel window covering a source at `(x0, y0)` with support radius `h`.
#[inline]
pub fn source_window<T: Float>(
    x0: T,
    y0: T,
    h: T,
    nx: usize,
    ny: usize,
    num_rhalfs: T,
) -> Option<PixelWindow> {
    let imin = rhalfs_to_pixels(y0 - h, ny, num_rhalfs);
    let imax = rhalfs_to_pixels(y0 + h, ny, num_rhalfs);
    let jmin = rhalfs_to_pixels(x0 - h, nx, num_rhalfs);
    let jmax = rhalfs_to_pixels(x0 + h, nx, num_rhalfs);

    PixelWindow::clip(imin, imax, jmin, jmax, nx, ny)
}

/// Add one source's contribution to every cell of `window`.
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn deposit_source<T: Float>(
    x_grid: &[T],
    y_grid: &[T],
    z: &mut [T],
    ny: usize,
    window: &PixelWindow,
    x0: T,
    y0: T,
    weight: T,
    h: T,
) {
    for i in window.imin..=window.imax {
        let row = i * ny;
        for j in window.jmin..=window.jmax {
            let n = row + j;
            let dx = x_grid[n] - x0;
            let dy = y_grid[n] - y0;
            let r = (dx * dx + dy * dy).sqrt();
            z[n] = z[n] + weight * CubicSpline::evaluate(r, h);
        }
    }
}

// ============================================================================
// Accumulator
// ============================================================================

/// Deposit every source onto the grid, adding into `z`.
///
/// `z` is expected to be zeroed by the caller for a fresh image. The number of
/// sources is `x0.len()`; `y0`, `weights` and `hsml` must be at least as long.
#[allow(clippy::too_many_arguments, clippy::needless_range_loop)]
pub fn accumulate<T: Float>(
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
) {
    for k in 0..x0.len() {
        let h = CubicSpline::support_radius(hsml[k]);
        if let Some(window) = source_window(x0[k], y0[k], h, nx, ny, num_rhalfs) {
            deposit_source(x_grid, y_grid, z, ny, &window, x0[k], y0[k], weights[k], h);
        }
    }
}

/// Count the sources whose clipped window is empty.
pub fn count_outside<T: Float>(
    x0: &[T],
    y0: &[T],
    hsml: &[T],
    nx: usize,
    ny: usize,
    num_rhalfs: T,
) -> usize {
    (0..x0.len())
        .filter(|&k| {
            let h = CubicSpline::support_radius(hsml[k]);
            source_window(x0[k], y0[k], h, nx, ny, num_rhalfs).is_none()
        })
        .count()
}
