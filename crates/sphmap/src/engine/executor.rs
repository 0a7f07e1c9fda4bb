//! Execution engine for kernel deposition.
//!
//! ## Purpose
//!
//! This module drives a render: it owns the pixel grid, selects the sources
//! that take part, runs the deposition pass into an image buffer and turns
//! the buffer into a [`SmoothedImage`]. Batch and streaming adapters both go
//! through it, which keeps their results identical.
//!
//! ## Design notes
//!
//! * **Pluggable passes**: The deposition pass and the neighbour search are
//!   plain function pointers. The serial implementations live in the
//!   algorithms layer; extension crates inject parallel ones.
//! * **Additive**: [`SmoothingExecutor::deposit`] only ever adds into the
//!   buffer it is given, so a render can be split into consecutive chunks.
//! * **Units last**: Per-pixel scaling happens once in
//!   [`SmoothingExecutor::finish`], after every source has been deposited.
//! * **Logging**: Renders are traced at `debug`, chunks at `trace`, and
//!   non-finite pixels raise a `warn`.
//!
//! ## Invariants
//!
//! * The grid is square with `config.npixels` pixels per side.
//! * Sources are deposited in input order.
//!
//! ## Non-goals
//!
//! * This module does not validate inputs (handled by `validator`).
//! * This module does not schedule threads itself.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::deposit::{accumulate, count_outside};
use crate::algorithms::neighbors::smoothing_lengths;
use crate::algorithms::selection::SelectedSources;
use crate::engine::output::{PixelUnits, SmoothedImage};
use crate::evaluation::diagnostics::{ImageDiagnostics, SourceTally};
use crate::primitives::errors::SmoothingError;
use crate::primitives::grid::PixelGrid;

// ============================================================================
// Type Definitions
// ============================================================================

/// Signature for a custom deposition pass.
#[doc(hidden)]
pub type DepositPassFn<T> = fn(
    &[T],     // x_grid
    &[T],     // y_grid
    &mut [T], // z
    usize,    // nx
    usize,    // ny
    &[T],     // x0
    &[T],     // y0
    &[T],     // weights
    &[T],     // hsml
    T,        // num_rhalfs
);

/// Signature for a custom neighbour-search pass.
#[doc(hidden)]
pub type NeighborPassFn<T> = fn(
    &[[T; 3]], // positions
    usize,     // num_neighbors
) -> Vec<T>; // smoothing lengths

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a render.
#[derive(Debug, Clone)]
pub struct SmoothingConfig<T> {
    /// Domain half-width.
    pub num_rhalfs: T,

    /// Pixels per side.
    pub npixels: usize,

    /// Units of the returned values.
    pub units: PixelUnits,

    /// Drop sources that fail the range test before deposition.
    pub cull_out_of_range: bool,

    /// Compute diagnostics for the finished image.
    pub return_diagnostics: bool,

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++
    /// Custom deposition pass (enables parallel execution).
    #[doc(hidden)]
    pub custom_deposit_pass: Option<DepositPassFn<T>>,

    /// Custom neighbour-search pass.
    #[doc(hidden)]
    pub custom_neighbor_pass: Option<NeighborPassFn<T>>,

    /// Whether to use parallel execution.
    #[doc(hidden)]
    pub parallel: bool,
}

impl<T: Float> Default for SmoothingConfig<T> {
    fn default() -> Self {
        Self {
            num_rhalfs: T::from(7.5).unwrap_or_else(T::one),
            npixels: 256,
            units: PixelUnits::default(),
            cull_out_of_range: true,
            return_diagnostics: false,
            custom_deposit_pass: None,
            custom_neighbor_pass: None,
            parallel: false,
        }
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Render engine bound to one pixel grid.
#[derive(Debug, Clone)]
pub struct SmoothingExecutor<T> {
    config: SmoothingConfig<T>,
    grid: PixelGrid<T>,
}

impl<T: Float> SmoothingExecutor<T> {
    /// Create an executor and build its grid.
    pub fn from_config(config: SmoothingConfig<T>) -> Result<Self, SmoothingError> {
        let grid = PixelGrid::new(config.npixels, config.num_rhalfs)?;
        Ok(Self { config, grid })
    }

    /// The pixel grid.
    pub fn grid(&self) -> &PixelGrid<T> {
        &self.grid
    }

    /// The render configuration.
    pub fn config(&self) -> &SmoothingConfig<T> {
        &self.config
    }

    /// A zeroed image buffer for this grid.
    pub fn blank(&self) -> Vec<T> {
        self.grid.zeros()
    }

    // ========================================================================
    // Main Execution
    // ========================================================================

    /// Render one image from validated sources.
    pub fn run(&self, x: &[T], y: &[T], hsml: &[T], weights: Option<&[T]>) -> SmoothedImage<T> {
        tracing::debug!(
            npixels = self.config.npixels,
            sources = x.len(),
            parallel = self.config.parallel,
            "rendering image"
        );

        let mut values = self.blank();
        let tally = self.deposit(&mut values, x, y, hsml, weights);
        let image = self.finish(values, tally);

        tracing::debug!(
            kept = tally.kept(),
            culled = tally.culled,
            "image rendered"
        );
        image
    }

    /// Deposit validated sources into `z`, adding to what it already holds.
    pub fn deposit(
        &self,
        z: &mut [T],
        x: &[T],
        y: &[T],
        hsml: &[T],
        weights: Option<&[T]>,
    ) -> SourceTally<T> {
        let r = self.config.num_rhalfs;
        let n = self.grid.nx();
        let selected =
            SelectedSources::gather(x, y, hsml, weights, r, self.config.cull_out_of_range);

        let outside = if self.config.return_diagnostics {
            count_outside(&selected.x, &selected.y, &selected.hsml, n, n, r)
        } else {
            0
        };

        if !selected.is_empty() {
            let pass: DepositPassFn<T> = self.config.custom_deposit_pass.unwrap_or(accumulate);
            pass(
                self.grid.x(),
                self.grid.y(),
                z,
                n,
                n,
                &selected.x,
                &selected.y,
                &selected.weights,
                &selected.hsml,
                r,
            );
        }

        tracing::trace!(
            offered = selected.total,
            kept = selected.len(),
            culled = selected.culled,
            outside,
            "sources deposited"
        );

        SourceTally {
            total: selected.total,
            culled: selected.culled,
            outside,
            input_weight: selected.total_weight(),
        }
    }

    /// Convert an accumulated buffer into the configured units and attach
    /// diagnostics.
    pub fn finish(&self, mut values: Vec<T>, tally: SourceTally<T>) -> SmoothedImage<T> {
        let pixel_area = self.grid.pixel_area();
        let factor = self.config.units.factor(pixel_area);
        if factor != T::one() {
            for v in values.iter_mut() {
                *v = *v * factor;
            }
        }

        let diagnostics = if self.config.return_diagnostics {
            let diag = ImageDiagnostics::compute(
                &values,
                self.grid.ny(),
                self.config.units.cell_measure(pixel_area),
                &tally,
            );
            if !diag.is_finite() {
                tracing::warn!(
                    non_finite = diag.non_finite_pixels,
                    "image contains non-finite pixels"
                );
            }
            Some(diag)
        } else {
            None
        };

        SmoothedImage {
            values,
            nx: self.grid.nx(),
            ny: self.grid.ny(),
            num_rhalfs: self.config.num_rhalfs,
            pixel_size: self.grid.pixel_size(),
            units: self.config.units,
            sources_used: tally.kept(),
            diagnostics,
        }
    }

    // ========================================================================
    // Neighbour Search
    // ========================================================================

    /// Smoothing lengths from validated positions, using the injected pass
    /// when one is configured.
    pub fn smoothing_lengths(
        config: &SmoothingConfig<T>,
        positions: &[[T; 3]],
        num_neighbors: usize,
    ) -> Vec<T> {
        tracing::debug!(
            particles = positions.len(),
            num_neighbors,
            "searching neighbours"
        );
        let pass: NeighborPassFn<T> = config.custom_neighbor_pass.unwrap_or(smoothing_lengths);
        pass(positions, num_neighbors)
    }
}
